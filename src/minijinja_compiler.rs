//! MiniJinja-backed component compiler.
//!
//! A component is an HTML template with optional `<style>` blocks. Styles are
//! pulled out of the markup, the markup is compiled and rendered with MiniJinja,
//! and the result is wrapped into an ES module.
use minijinja::{AutoEscape, Environment};
use regex::Regex;
use std::sync::LazyLock;

use crate::compiler::{Compiled, CompileOptions, Compiler, CompilerError, CssOutput, Warning};

/// Version stamped into every generated module.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Forwarded option holding the render context of the markup.
pub const PROPS_KEY: &str = "props";

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style\s*>").unwrap());

/// Compiles component templates with MiniJinja.
#[derive(Debug, Default, Clone)]
pub struct MiniJinjaCompiler;

impl MiniJinjaCompiler {
    pub fn new() -> Self {
        Self
    }
}

/// Header line of every generated module.
pub fn banner() -> String {
    format!("/* generated by vinyl-component v{VERSION} */")
}

/// Splits `<style>` blocks out of `source`, returning the markup and the raw style text.
fn split_styles(source: &str) -> (String, String) {
    let styles: Vec<&str> = STYLE_BLOCK
        .captures_iter(source)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .filter(|style| !style.is_empty())
        .collect();
    let markup = STYLE_BLOCK.replace_all(source, "").into_owned();
    (markup, styles.join("\n"))
}

/// Drops style rules without declarations, reporting each one as a warning.
///
/// Top-level blocks are found by brace depth. At-rules and statements are kept
/// verbatim, nested blocks included.
fn clean_css(style: &str, options: &CompileOptions) -> String {
    let mut rules = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut open = 0;

    for (i, c) in style.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    open = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth > 0 {
                    continue;
                }
                let prelude = style[start..open].trim();
                let body = style[open + 1..i].trim();
                if body.is_empty() && !prelude.starts_with('@') {
                    options.warn(Warning {
                        code: "css-empty-rule".to_string(),
                        message: format!("Rule \"{prelude}\" has no declarations"),
                        filename: options.filename.clone(),
                    });
                } else {
                    rules.push(style[start..=i].trim());
                }
                start = i + 1;
            }
            ';' if depth == 0 => {
                let statement = style[start..=i].trim();
                if !statement.is_empty() {
                    rules.push(statement);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    let rest = style[start..].trim();
    if !rest.is_empty() {
        rules.push(rest);
    }
    rules.join("\n")
}

fn to_compiler_error(err: minijinja::Error, options: &CompileOptions) -> CompilerError {
    let message = match err.detail() {
        Some(detail) => format!("{}: {}", err.kind(), detail),
        None => err.kind().to_string(),
    };
    CompilerError {
        message,
        filename: options.filename.clone(),
        line: err.line(),
    }
}

/// JSON string literals are valid JavaScript string literals.
fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

fn render_module(markup: &str, css: &str, css_output: CssOutput) -> String {
    let inject = css_output == CssOutput::Injected && !css.is_empty();
    let mut module = format!("{}\n\nconst markup = {};\n", banner(), js_string(markup));

    if inject {
        module.push_str(&format!("const css = {};\n", js_string(css)));
        module.push_str(
            "\nfunction add_css() {\n\
             \tconst style = document.createElement(\"style\");\n\
             \tstyle.textContent = css;\n\
             \tdocument.head.appendChild(style);\n\
             }\n",
        );
    }

    module.push_str("\nexport default function mount(target) {\n");
    if inject {
        module.push_str("\tadd_css();\n");
    }
    module.push_str("\ttarget.innerHTML = markup;\n}\n");
    module
}

impl Compiler for MiniJinjaCompiler {
    fn compile(&self, source: &str, options: &CompileOptions) -> Result<Compiled, CompilerError> {
        let (markup, style) = split_styles(source);
        let css = clean_css(&style, options);

        let name = options
            .filename
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "component".to_string());
        let props = options
            .extra
            .get(PROPS_KEY)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}));

        let mut env = Environment::new();
        // Markup is HTML whatever the file is called.
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template(&name, &markup)
            .map_err(|e| to_compiler_error(e, options))?;
        let tmpl = env
            .get_template(&name)
            .map_err(|e| to_compiler_error(e, options))?;
        let rendered = tmpl
            .render(&props)
            .map_err(|e| to_compiler_error(e, options))?;

        Ok(Compiled {
            js: render_module(rendered.trim(), &css, options.css),
            css: Some(css),
        })
    }
}
