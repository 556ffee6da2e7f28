use crate::decode_field::FieldMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

pub(crate) fn from_row_trait(item: &ItemStruct, fields: &[FieldMetadata]) -> TokenStream {
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let assignments = fields.iter().map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        if f.is_skipped() {
            quote!(#ident: ::std::default::Default::default())
        } else if f.recurse {
            quote!(#ident: <#ty as ::rowmap::FromRow>::from_row(row)?)
        } else {
            let label = f.bind_name();
            quote!(#ident: ::rowmap::decode_column::<#ty>(row, #label)?)
        }
    });
    let labels = fields.iter().filter(|f| !f.is_skipped()).map(|f| {
        if f.recurse {
            let ty = &f.ty;
            quote!(result.extend(<#ty as ::rowmap::FromRow>::column_labels());)
        } else {
            let label = f.bind_name();
            quote!(result.push(#label);)
        }
    });
    quote! {
        impl #impl_generics ::rowmap::FromRow for #name #ty_generics #where_clause {
            fn column_labels() -> ::std::vec::Vec<&'static str> {
                #[allow(unused_mut)]
                let mut result = ::std::vec::Vec::new();
                #(#labels)*
                result
            }
            fn from_row(row: &::rowmap::RowLabeled) -> ::rowmap::Result<Self> {
                Ok(Self {
                    #(#assignments,)*
                })
            }
        }
    }
}
