//! Delegating-method emitter
//!
//! Renders one `impl` block on the wrapper type. Each method keeps the
//! original name and parameter list, forwards its arguments to the wrapped
//! session and re-wraps the result, so chains never fall back to the
//! wrapped type.

use crate::scan::Method;

/// Banner placed at the top of every generated file.
pub const BANNER: &str = "// Code generated by wrapper-gen. DO NOT EDIT.";

/// Signatures wider than this put one parameter per line, as rustfmt does.
const MAX_WIDTH: usize = 100;

/// Render the generated module for `wrapper` (e.g. `Session`), whose wrapped
/// session lives in the field `inner`.
pub fn render(wrapper: &str, methods: &[Method]) -> String {
    let mut out = String::new();

    out.push_str(BANNER);
    out.push_str("\n\n");
    out.push_str("#[allow(unused_imports)]\n");
    out.push_str("use crate::query::*;\n");
    out.push('\n');
    out.push_str(&format!("use super::{};\n\n", wrapper));
    out.push_str(&format!("impl {} {{\n", wrapper));

    for (i, method) in methods.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_method(&mut out, wrapper, method);
    }

    out.push_str("}\n");
    out
}

fn render_method(out: &mut String, wrapper: &str, method: &Method) {
    let params: Vec<String> = method
        .params
        .iter()
        .enumerate()
        .map(|(i, param)| format!("x{}: {}", i, param.declared_type()))
        .collect();
    let args: Vec<String> = (0..method.params.len()).map(|i| format!("x{}", i)).collect();

    let signature = format!(
        "    pub fn {}(self, {}) -> {} {{\n",
        method.name,
        params.join(", "),
        wrapper
    );
    if signature.trim_end().len() <= MAX_WIDTH {
        out.push_str(&signature);
    } else {
        out.push_str(&format!("    pub fn {}(\n        self,\n", method.name));
        for param in &params {
            out.push_str(&format!("        {},\n", param));
        }
        out.push_str(&format!("    ) -> {} {{\n", wrapper));
    }
    out.push_str(&format!(
        "        {}::new(self.inner.{}({}))\n",
        wrapper,
        method.name,
        args.join(", ")
    ));
    out.push_str("    }\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Param;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_forwards_by_index() {
        let methods = vec![
            Method {
                name: "desc".to_string(),
                params: vec![Param {
                    ty: "&str".to_string(),
                    variadic: false,
                }],
            },
            Method {
                name: "where_clause".to_string(),
                params: vec![
                    Param {
                        ty: "&str".to_string(),
                        variadic: false,
                    },
                    Param {
                        ty: "impl Into<SqlValue>".to_string(),
                        variadic: true,
                    },
                ],
            },
        ];

        let expected = "\
// Code generated by wrapper-gen. DO NOT EDIT.

#[allow(unused_imports)]
use crate::query::*;

use super::Session;

impl Session {
    pub fn desc(self, x0: &str) -> Session {
        Session::new(self.inner.desc(x0))
    }

    pub fn where_clause(
        self,
        x0: &str,
        x1: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Session {
        Session::new(self.inner.where_clause(x0, x1))
    }
}
";
        assert_eq!(render("Session", &methods), expected);
    }

    #[test]
    fn test_render_output_parses() {
        let methods = vec![Method {
            name: "limit".to_string(),
            params: vec![
                Param {
                    ty: "i64".to_string(),
                    variadic: false,
                },
                Param {
                    ty: "i64".to_string(),
                    variadic: false,
                },
            ],
        }];
        let file = syn::parse_file(&render("Session", &methods)).unwrap();
        assert_eq!(file.items.len(), 3);
    }
}
