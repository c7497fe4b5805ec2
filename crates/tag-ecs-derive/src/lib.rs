//! Derive macro for tag-ecs components.
//!
//! `#[derive(Component)]` turns a struct into a component factory: the type
//! carries its identifier as `ComponentKind::ID` and every value of the type
//! is an instance that can be attached to an entity.
//!
//! # Merged Fields
//!
//! Named fields are exposed on the entity's merged field surface. Reads and
//! writes go through `tag_ecs::FieldValue`.
//!
//! ```ignore
//! #[derive(Component)]
//! #[component(id = "door")]
//! struct Door { locked: bool }
//! ```
//!
//! # Attributes
//!
//! Container:
//! - `id = "..."` - identifier (defaults to the snake_case type name)
//! - `dispose = path` - disposer, `fn(&mut Self) -> Result<(), DisposeError>`
//! - `opaque` - expose no fields; the value is reachable by typed access only
//!
//! Field:
//! - `readonly` - readable; writes fail with `ReadOnlyField`
//! - `opaque` - name is claimed but the value is not readable or writable
//! - `skip` - not on the merged surface at all
//!
//! Tuple structs must be container-opaque. Enums and unions are rejected.
//!
//! # Allowed Types
//!
//! Exposed fields (read-write and `readonly`) must be one of:
//! - `bool`, `char`, `String`
//! - `i8`..`i128`, `isize`, `u8`..`u128`, `usize` (read as `None` outside `i64`)
//! - `f32`, `f64`
//! - `Option<T>` of any of the above (`None` is `Value::Null`)
//!
//! Anything else is a compile error at the field type; mark it `opaque` or
//! `skip`.

use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::{
    Attribute, Data, DeriveInput, Fields, Ident, LitStr, Path, Type, ext::IdentExt,
    spanned::Spanned,
};

/// Container-level `#[component(..)]` settings.
#[derive(Default)]
struct ContainerAttrs {
    id: Option<LitStr>,
    dispose: Option<Path>,
    opaque: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldMode {
    ReadWrite,
    ReadOnly,
    Opaque,
    Skip,
}

struct MergedField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    name: String,
    mode: FieldMode,
}

fn parse_container(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("component") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                out.id = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("dispose") {
                out.dispose = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("opaque") {
                out.opaque = true;
            } else {
                return Err(meta.error("expected `id = \"...\"`, `dispose = path` or `opaque`"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

fn parse_field_mode(attrs: &[Attribute]) -> syn::Result<FieldMode> {
    let mut mode = FieldMode::ReadWrite;
    for attr in attrs {
        if !attr.path().is_ident("component") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            mode = if meta.path.is_ident("readonly") {
                FieldMode::ReadOnly
            } else if meta.path.is_ident("opaque") {
                FieldMode::Opaque
            } else if meta.path.is_ident("skip") {
                FieldMode::Skip
            } else {
                return Err(meta.error("expected `readonly`, `opaque` or `skip`"));
            };
            Ok(())
        })?;
    }
    Ok(mode)
}

/// Derive `tag_ecs::Component` and `tag_ecs::ComponentKind`.
///
/// # Examples
///
/// ```ignore
/// #[derive(Component)]
/// #[component(id = "color")]
/// struct Color { hex: String }
///
/// #[derive(Component)]
/// #[component(dispose = Handle::release)]
/// struct Handle {
///     #[component(readonly)]
///     slot: u32,
///     #[component(skip)]
///     pool: Arc<Pool>,
/// }
/// ```
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let container = parse_container(&input.attrs)?;

    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(_) => {
            return Ok(quote_spanned! {
                input.ident.span() =>
                compile_error!("Enums cannot derive Component. Use a struct, or attach one tag per variant.");
            });
        }
        Data::Union(_) => {
            return Ok(quote_spanned! {
                input.ident.span() =>
                compile_error!("Unions cannot derive Component. Use a struct instead.");
            });
        }
    };

    let merged = if container.opaque {
        Vec::new()
    } else {
        collect_fields(&data.fields)?
    };

    let id = container
        .id
        .as_ref()
        .map_or_else(|| name.to_string().to_snake_case(), LitStr::value);

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_methods = field_methods(&merged);
    let dispose = container.dispose.as_ref().map(|path| {
        quote! {
            fn dispose(&mut self) -> ::core::result::Result<(), ::tag_ecs::DisposeError> {
                #path(self)
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::tag_ecs::Component for #name #ty_generics #where_clause {
            fn id(&self) -> &str {
                #id
            }

            #field_methods
            #dispose
        }

        impl #impl_generics ::tag_ecs::ComponentKind for #name #ty_generics #where_clause {
            const ID: &'static str = #id;
        }
    })
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<MergedField<'_>>> {
    match fields {
        Fields::Named(named) => {
            let mut merged = Vec::with_capacity(named.named.len());
            for field in &named.named {
                let mode = parse_field_mode(&field.attrs)?;
                if mode == FieldMode::Skip {
                    continue;
                }
                // Named fields always carry an ident.
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                merged.push(MergedField {
                    ident,
                    ty: &field.ty,
                    name: ident.unraw().to_string(),
                    mode,
                });
            }
            Ok(merged)
        }
        Fields::Unnamed(unnamed) => Err(syn::Error::new(
            unnamed.span(),
            "tuple structs have no field names to merge; add #[component(opaque)]",
        )),
        Fields::Unit => Ok(Vec::new()),
    }
}

fn field_methods(merged: &[MergedField<'_>]) -> proc_macro2::TokenStream {
    if merged.is_empty() {
        return proc_macro2::TokenStream::new();
    }

    let names = merged.iter().map(|f| &f.name);

    let reads = merged
        .iter()
        .filter(|f| matches!(f.mode, FieldMode::ReadWrite | FieldMode::ReadOnly))
        .map(|f| {
            let (name, ident, ty) = (&f.name, f.ident, f.ty);
            quote_spanned! {ty.span()=>
                #name => <#ty as ::tag_ecs::FieldValue>::to_value(&self.#ident),
            }
        });

    let writes = merged.iter().map(|f| {
        let (name, ident, ty) = (&f.name, f.ident, f.ty);
        if f.mode == FieldMode::ReadWrite {
            quote_spanned! {ty.span()=>
                #name => {
                    self.#ident = <#ty as ::tag_ecs::FieldValue>::from_value(value)
                        .map_err(|e| ::tag_ecs::ValueError::for_field(e, name))?;
                    ::core::result::Result::Ok(())
                }
            }
        } else {
            quote! {
                #name => ::core::result::Result::Err(::tag_ecs::EcsError::ReadOnlyField {
                    field: ::std::borrow::ToOwned::to_owned(name),
                }),
            }
        }
    });

    quote! {
        fn fields(&self) -> &[&str] {
            &[#(#names),*]
        }

        fn field(&self, name: &str) -> ::core::option::Option<::tag_ecs::Value> {
            match name {
                #(#reads)*
                _ => ::core::option::Option::None,
            }
        }

        #[allow(unused_variables)]
        fn set_field(&mut self, name: &str, value: ::tag_ecs::Value) -> ::tag_ecs::Result<()> {
            match name {
                #(#writes)*
                _ => ::core::result::Result::Err(::tag_ecs::EcsError::UnknownField {
                    field: ::std::borrow::ToOwned::to_owned(name),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn expand_str(input: &DeriveInput) -> String {
        expand(input).unwrap().to_string()
    }

    #[test]
    fn test_default_id_is_snake_case() {
        let input: DeriveInput = parse_quote! {
            struct PhysicsBody { mass: f64 }
        };
        let out = expand_str(&input);
        assert!(out.contains("\"physics_body\""));
        assert!(out.contains("ComponentKind"));
    }

    #[test]
    fn test_explicit_id_and_dispose() {
        let input: DeriveInput = parse_quote! {
            #[component(id = "door", dispose = Door::release)]
            struct Door { locked: bool }
        };
        let out = expand_str(&input);
        assert!(out.contains("\"door\""));
        assert!(out.contains("fn dispose"));
        assert!(out.contains("release"));
    }

    #[test]
    fn test_field_modes() {
        let input: DeriveInput = parse_quote! {
            struct Mixed {
                open: i32,
                #[component(readonly)]
                fixed: i32,
                #[component(opaque)]
                hidden: Vec<u8>,
                #[component(skip)]
                internal: u8,
            }
        };
        let out = expand_str(&input);
        let open = out.find("\"open\"").unwrap();
        let fixed = out.find("\"fixed\"").unwrap();
        let hidden = out.find("\"hidden\"").unwrap();
        assert!(open < fixed && fixed < hidden);
        assert!(!out.contains("\"internal\""));
        assert!(out.contains("ReadOnlyField"));
    }

    #[test]
    fn test_fields_convert_through_field_value() {
        let input: DeriveInput = parse_quote! {
            struct Counter { hits: u64, last: Option<char> }
        };
        let out = expand_str(&input);
        assert!(out.contains("to_value"));
        assert!(out.contains("from_value"));
        assert!(out.contains("FieldValue"));
    }

    #[test]
    fn test_opaque_container_has_no_fields() {
        let input: DeriveInput = parse_quote! {
            #[component(opaque)]
            struct Handle(u64);
        };
        let out = expand_str(&input);
        assert!(!out.contains("fn fields"));
    }

    #[test]
    fn test_tuple_struct_requires_opaque() {
        let input: DeriveInput = parse_quote! {
            struct Handle(u64);
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let container: DeriveInput = parse_quote! {
            #[component(persist)]
            struct A { x: i32 }
        };
        assert!(expand(&container).is_err());

        let field: DeriveInput = parse_quote! {
            struct B {
                #[component(hidden)]
                x: i32,
            }
        };
        assert!(expand(&field).is_err());
    }

    #[test]
    fn test_enums_and_unions_emit_compile_error() {
        let input: DeriveInput = parse_quote! {
            enum State { Open, Closed }
        };
        assert!(expand_str(&input).contains("compile_error"));

        let input: DeriveInput = parse_quote! {
            union Bits { a: u32, b: f32 }
        };
        assert!(expand_str(&input).contains("compile_error"));
    }
}
