use convert_case::{Case, Casing};
use syn::{ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) fn table_name(item: &ItemStruct) -> String {
    let mut result = item.ident.to_string().to_case(Case::Snake);
    for attr in &item.attrs {
        if !attr.meta.path().is_ident("rowmap") {
            continue;
        }
        let Ok(list) = attr.meta.require_list() else {
            panic!(
                "Error while parsing `rowmap`, use it like: `#[rowmap(table = \"{result}\")]`"
            );
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("table") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!(
                        "Error while parsing `table`, use it like: `#[rowmap(table = \"{result}\")]`"
                    );
                };
                result = v.value();
            } else {
                panic!("Unknown attribute on the struct inside rowmap macro, only `table` is allowed");
            }
            Ok(())
        });
    }
    result
}
