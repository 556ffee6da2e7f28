use crate::decode_type::{is_uuid, option_inner};
use quote::ToTokens;
use syn::{Field, Ident, LitStr, Type, parse::ParseBuffer};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) alias: String,
    pub(crate) operator: String,
    pub(crate) recurse: bool,
    pub(crate) attach: String,
    pub(crate) binary_id: bool,
    pub(crate) nullable: bool,
}

impl FieldMetadata {
    pub(crate) fn is_skipped(&self) -> bool {
        let name = self.name.trim();
        name.is_empty() || name == "-"
    }
    /// Label of the column decoded into this field.
    pub(crate) fn bind_name(&self) -> String {
        if !self.alias.is_empty() {
            return self.alias.clone();
        }
        self.name.split_whitespace().collect::<Vec<_>>().join("_")
    }
}

fn string_value(arg: &syn::meta::ParseNestedMeta, attribute: &str) -> String {
    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
        panic!(
            "Error while parsing `{attribute}`, use it like: `#[rowmap({attribute} = \"value\")]`"
        );
    };
    v.value()
}

fn flag(arg: &syn::meta::ParseNestedMeta, attribute: &str) {
    let Err(..) = arg.value() else {
        // value() is Err for Meta::Path
        panic!("Error while parsing `{attribute}`, use it like: `#[rowmap({attribute})]`");
    };
}

pub(crate) fn decode_field(field: &Field) -> FieldMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let mut name = ident.to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = FieldMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        alias: "".into(),
        operator: "".into(),
        recurse: false,
        attach: "".into(),
        binary_id: is_uuid(&field.ty),
        nullable: option_inner(&field.ty).is_some(),
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("rowmap") {
            let Ok(list) = meta.require_list() else {
                panic!(
                    "Error while parsing `rowmap`, use it like: `#[rowmap(attribute = value, ...)]`",
                );
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("name") {
                    metadata.name = string_value(&arg, "name");
                } else if arg.path.is_ident("alias") {
                    metadata.alias = string_value(&arg, "alias");
                } else if arg.path.is_ident("op") {
                    metadata.operator = string_value(&arg, "op");
                } else if arg.path.is_ident("attach") {
                    metadata.attach = string_value(&arg, "attach");
                } else if arg.path.is_ident("skip") {
                    flag(&arg, "skip");
                    metadata.name = "-".into();
                } else if arg.path.is_ident("recurse") {
                    flag(&arg, "recurse");
                    metadata.recurse = true;
                } else if arg.path.is_ident("binary_id") {
                    flag(&arg, "binary_id");
                    metadata.binary_id = true;
                } else {
                    panic!(
                        "Unknown attribute `{}` inside rowmap macro",
                        arg.path.to_token_stream()
                    );
                }
                Ok(())
            });
        }
    }
    if metadata.recurse {
        metadata.binary_id = false;
    }
    metadata
}
