use crate::decode_field::FieldMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

pub(crate) fn attach_trait(item: &ItemStruct, fields: &[FieldMetadata]) -> TokenStream {
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let steps = fields.iter().filter_map(|f| {
        let ident = &f.ident;
        let field = ident.to_string();
        let path = &f.attach;
        if f.recurse {
            let attach = quote! {
                ::rowmap::Context::with_context(
                    ::rowmap::Attach::attach_from(&mut self.#ident, source),
                    || format!("While attaching field `{}`", #field),
                )?;
            };
            Some(if path.is_empty() {
                attach
            } else {
                quote! {
                    if ::rowmap::resolves(source, #path) {
                        #attach
                    }
                }
            })
        } else if !path.is_empty() {
            Some(quote!(::rowmap::attach_value(&mut self.#ident, source, #path, #field)?;))
        } else {
            None
        }
    });
    quote! {
        impl #impl_generics ::rowmap::Attach for #name #ty_generics #where_clause {
            fn attach_from(&mut self, source: &dyn ::rowmap::Tagged) -> ::rowmap::Result<()> {
                #(#steps)*
                Ok(())
            }
        }
    }
}
