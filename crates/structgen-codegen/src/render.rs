//! Final source text

use proc_macro2::TokenStream;
use structgen_core::{GenerateError, GenerateResult};

/// First line of every generated file
pub const GENERATED_MARKER: &str = "// Code generated by structgen. DO NOT EDIT.";

/// Header comment naming the module and record type
pub fn header(module_name: &str, type_name: &str) -> String {
    format!("{GENERATED_MARKER}\n// Module {module_name} contains auto-generated {type_name} data\n\n")
}

/// Parse the assembled items as a file and pretty-print them under the header
pub fn render_file(tokens: TokenStream, module_name: &str, type_name: &str) -> GenerateResult<String> {
    let file: syn::File =
        syn::parse2(tokens).map_err(|e| GenerateError::Render(e.to_string()))?;
    let body = prettyplease::unparse(&file);
    Ok(format!("{}{body}", header(module_name, type_name)))
}
