mod attach_trait;
mod decode_field;
mod decode_type;
mod from_row_trait;
mod table_name;
mod tagged_trait;

use attach_trait::attach_trait;
use decode_field::{FieldMetadata, decode_field};
use from_row_trait::from_row_trait;
use proc_macro::TokenStream;
use quote::quote;
use syn::{Fields, ItemStruct, parse_macro_input};
use table_name::table_name;
use tagged_trait::tagged_trait;

fn decode_fields(item: &ItemStruct) -> Vec<FieldMetadata> {
    let Fields::Named(fields) = &item.fields else {
        panic!(
            "`{}` must have named fields to derive the rowmap traits",
            item.ident
        );
    };
    fields.named.iter().map(decode_field).collect()
}

/// Implements `Tagged`: the field tags as a static table plus access to the field values.
///
/// Field attributes: `#[rowmap(name = "col", alias = "bind", op = ">=", recurse, skip,
/// binary_id, attach = "path.to.value")]`.
#[proc_macro_derive(Tagged, attributes(rowmap))]
pub fn derive_tagged(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let fields = decode_fields(&item);
    tagged_trait(&item, &fields).into()
}

/// Implements `FromRow`, every field is decoded from the column labeled with its bind name.
#[proc_macro_derive(FromRow, attributes(rowmap))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let fields = decode_fields(&item);
    from_row_trait(&item, &fields).into()
}

/// Implements `Tagged`, `FromRow` and `Entity`. The table defaults to the snake case
/// struct name, `#[rowmap(table = "name")]` overrides it.
#[proc_macro_derive(Entity, attributes(rowmap))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let fields = decode_fields(&item);
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let table_name = table_name(&item);
    let tagged = tagged_trait(&item, &fields);
    let from_row = from_row_trait(&item, &fields);
    quote! {
        #tagged
        #from_row
        impl #impl_generics ::rowmap::Entity for #name #ty_generics #where_clause {
            fn table_name() -> &'static str {
                #table_name
            }
        }
    }
    .into()
}

/// Implements `Attach` for an external shape. The struct must implement `Default`.
#[proc_macro_derive(Attach, attributes(rowmap))]
pub fn derive_attach(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let fields = decode_fields(&item);
    attach_trait(&item, &fields).into()
}
