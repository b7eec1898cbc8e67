//! Procedural macros for turning plain functions into model-callable tools

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, punctuated::Punctuated, token::Comma, Attribute, Expr, ExprLit, ItemFn,
    Lit, Meta, Type,
};

/// Attribute macro that generates a tool declaration and registration for a function
///
/// # Example
///
/// ```ignore
/// /// Calculate the budget for a single day
/// #[tool]
/// fn calculate_daily_budget(args: DailyBudgetArgs) -> Result<DailyBudget, String> {
///     // Implementation
/// }
///
/// #[tool(name = "convert", description = "Convert between currencies")]
/// async fn convert_currency(args: ConvertArgs) -> Result<Conversion, String> {
///     // Implementation
/// }
/// ```
///
/// For `calculate_daily_budget` this generates a module `calculate_daily_budget_tool` with:
/// - `NAME`: the tool name
/// - `declaration()`: the `ToolDeclaration`, schema derived from the argument type
/// - `execute`: re-export of the original function
/// - `registration()`: a `ToolRegistration` for `FunctionRegistry::register`
///
/// # Attributes
///
/// - `description`: what the tool does; defaults to the function's doc comment
/// - `name`: override the tool name (defaults to the function name)
///
/// The argument type must implement `Deserialize` and `JsonSchema`, and the
/// function must return `Result<T, String>` with `T: Serialize`.
#[proc_macro_attribute]
pub fn tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = parse_macro_input!(attr with Punctuated::<Meta, Comma>::parse_terminated);
    let input_fn = parse_macro_input!(item as ItemFn);

    let mut description = None;
    let mut tool_name = None;

    for arg in attr_args {
        let Meta::NameValue(nv) = arg else {
            continue;
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) = &nv.value
        else {
            return syn::Error::new_spanned(&nv.value, "expected a string literal")
                .to_compile_error()
                .into();
        };

        if nv.path.is_ident("description") {
            description = Some(lit.value());
        } else if nv.path.is_ident("name") {
            tool_name = Some(lit.value());
        } else {
            return syn::Error::new_spanned(
                &nv.path,
                "unknown tool attribute; expected `name` or `description`",
            )
            .to_compile_error()
            .into();
        }
    }

    let description = match description.or_else(|| doc_comment(&input_fn.attrs)) {
        Some(d) => d,
        None => {
            return syn::Error::new_spanned(
                &input_fn.sig,
                "tool needs a doc comment or a `description = \"...\"` argument",
            )
            .to_compile_error()
            .into();
        }
    };

    let fn_name = &input_fn.sig.ident;
    let tool_name = tool_name.unwrap_or_else(|| fn_name.to_string());

    let arg_type = match input_fn.sig.inputs.first() {
        Some(syn::FnArg::Typed(pat_type)) if input_fn.sig.inputs.len() == 1 => &pat_type.ty,
        _ => {
            return syn::Error::new_spanned(
                &input_fn.sig,
                "tool function must take exactly one argument struct",
            )
            .to_compile_error()
            .into();
        }
    };
    let base_type = strip_type_modifiers(arg_type);

    // multiply -> multiply_tool
    let module_name = syn::Ident::new(&format!("{}_tool", fn_name), fn_name.span());

    let mut pub_input_fn = input_fn.clone();
    pub_input_fn.vis = syn::parse_quote!(pub);

    // Sync results are wrapped in a ready future so both shapes share one path
    let invoke = if input_fn.sig.asyncness.is_some() {
        quote! { execute(args).await }
    } else {
        quote! { execute(args) }
    };

    let output = quote! {
        #pub_input_fn

        #[allow(dead_code)]
        pub mod #module_name {
            use super::*;

            /// The name of this tool (use when registering)
            pub const NAME: &str = #tool_name;

            /// Get the ToolDeclaration for this tool
            pub fn declaration() -> trip_planner::llm::ToolDeclaration {
                trip_planner::llm::create_tool_declaration::<#base_type>(#tool_name, #description)
            }

            /// The executable function for this tool (re-exported from parent)
            pub use super::#fn_name as execute;

            /// Get a complete ToolRegistration for one-step registration
            pub fn registration() -> trip_planner::llm::tools::ToolRegistration {
                let wrapper = move |args_json: serde_json::Value| {
                    let parsed = serde_json::from_value::<#base_type>(args_json)
                        .map_err(|e| format!("Failed to deserialize arguments: {}", e));

                    Box::pin(async move {
                        let args = parsed?;
                        let result = #invoke?;
                        serde_json::to_string(&result)
                            .map_err(|e| format!("Failed to serialize result: {}", e))
                    }) as futures::future::BoxFuture<'static, Result<String, String>>
                };

                trip_planner::llm::tools::ToolRegistration {
                    name: NAME,
                    function: Box::new(wrapper),
                    declaration: declaration(),
                }
            }
        }
    };

    TokenStream::from(output)
}

/// Join `///` lines into a single description
fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }) => Some(lit.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();

    (!lines.is_empty()).then(|| lines.join(" "))
}

/// Strip reference modifiers from a type to get the base type
fn strip_type_modifiers(ty: &Type) -> &Type {
    match ty {
        Type::Reference(type_ref) => strip_type_modifiers(&type_ref.elem),
        _ => ty,
    }
}
