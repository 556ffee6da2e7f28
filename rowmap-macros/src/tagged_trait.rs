use crate::decode_field::FieldMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

fn field_def(field: &FieldMetadata) -> TokenStream {
    let ident = field.ident.to_string();
    let FieldMetadata {
        name,
        alias,
        operator,
        recurse,
        attach,
        binary_id,
        nullable,
        ..
    } = field;
    quote! {
        ::rowmap::FieldDef {
            ident: #ident,
            name: #name,
            alias: #alias,
            operator: #operator,
            recurse: #recurse,
            attach: #attach,
            binary_id: #binary_id,
            nullable: #nullable,
        }
    }
}

fn field_slot(field: &FieldMetadata) -> TokenStream {
    let ident = &field.ident;
    if field.recurse {
        if field.nullable {
            quote! {
                ::rowmap::FieldSlot::Nested(
                    self.#ident.as_ref().map(|v| v as &dyn ::rowmap::Tagged)
                )
            }
        } else {
            quote!(::rowmap::FieldSlot::Nested(Some(&self.#ident)))
        }
    } else {
        quote! {
            ::rowmap::FieldSlot::Value(::rowmap::AsValue::as_value(
                ::std::clone::Clone::clone(&self.#ident)
            ))
        }
    }
}

pub(crate) fn tagged_trait(item: &ItemStruct, fields: &[FieldMetadata]) -> TokenStream {
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let len = fields.len();
    let defs = fields.iter().map(field_def);
    let slots = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.is_skipped())
        .map(|(i, f)| {
            let slot = field_slot(f);
            quote!(#i => #slot)
        });
    quote! {
        impl #impl_generics ::rowmap::Tagged for #name #ty_generics #where_clause {
            fn field_defs(&self) -> &'static [::rowmap::FieldDef] {
                static FIELDS: [::rowmap::FieldDef; #len] = [#(#defs),*];
                &FIELDS
            }
            fn field(&self, index: usize) -> ::rowmap::FieldSlot<'_> {
                match index {
                    #(#slots,)*
                    _ => ::rowmap::FieldSlot::Skipped,
                }
            }
        }
    }
}
