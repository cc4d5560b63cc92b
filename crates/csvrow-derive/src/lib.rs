//! `#[derive(Record)]` for csvrow.
//!
//! Each field becomes a field descriptor in declaration order. A field marked
//! `#[csv("Column Name")]` (or `#[csv(column = "Column Name")]`) carries the
//! metadata `csv:"Column Name"` and assigns decoded cells through
//! `csvrow::Coerce`; unmarked fields carry empty metadata and are never
//! written.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Member, parse_macro_input, spanned::Spanned};

#[proc_macro_derive(Record, attributes(csv))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.ident.span(),
            "Record can only be derived for structs",
        ));
    };

    let descriptors = match &data.fields {
        Fields::Named(fields) => fields
            .named
            .iter()
            .enumerate()
            .map(|(index, field)| descriptor(index, field))
            .collect::<syn::Result<Vec<_>>>()?,
        Fields::Unnamed(fields) => fields
            .unnamed
            .iter()
            .enumerate()
            .map(|(index, field)| descriptor(index, field))
            .collect::<syn::Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
    };

    let ident = &input.ident;
    // `Record: Default`, so generic parameters only need the bound through `Self`.
    let mut generics = input.generics.clone();
    generics
        .make_where_clause()
        .predicates
        .push(syn::parse_quote!(Self: ::core::default::Default));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::csvrow::Record for #ident #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::csvrow::FieldDescriptor<Self>> {
                ::std::vec![ #(#descriptors),* ]
            }
        }
    })
}

fn descriptor(index: usize, field: &syn::Field) -> syn::Result<TokenStream2> {
    let member = field.ident.clone().map_or_else(
        || Member::Unnamed(syn::Index::from(index)),
        Member::Named,
    );
    let name = match &field.ident {
        Some(ident) => {
            let text = ident.to_string();
            text.strip_prefix("r#").map_or_else(|| text.clone(), str::to_owned)
        }
        None => index.to_string(),
    };

    let Some(column) = column_attr(field)? else {
        return Ok(quote! {
            ::csvrow::FieldDescriptor::new(#name, "", |_: &mut Self, _: &str| {})
        });
    };

    let metadata = tag_metadata(&column);
    Ok(quote! {
        ::csvrow::FieldDescriptor::new(#name, #metadata, |row: &mut Self, raw: &str| {
            ::csvrow::Coerce::coerce(&mut row.#member, raw);
        })
    })
}

/// Column name declared by the field's `#[csv(...)]` attribute, if any.
fn column_attr(field: &syn::Field) -> syn::Result<Option<String>> {
    let mut column = None;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("csv")) {
        if column.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "duplicate #[csv(...)] attribute on field",
            ));
        }

        if let Ok(lit) = attr.parse_args::<LitStr>() {
            column = Some(lit.value());
            continue;
        }

        let mut named = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                named = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `column = \"...\"` or a string literal"))
            }
        })?;
        let Some(value) = named else {
            return Err(syn::Error::new(attr.span(), "missing column name"));
        };
        column = Some(value);
    }
    Ok(column)
}

/// Renders a column name as struct-tag metadata, `csv:"<escaped name>"`.
fn tag_metadata(column: &str) -> String {
    let mut out = String::with_capacity(column.len() + 6);
    out.push_str("csv:\"");
    for c in column.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\x00"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
