use syn::{GenericArgument, PathArguments, Type};

/// Last path segment of `ty` with its single generic argument, if any.
fn last_segment(ty: &Type) -> Option<(String, Option<&Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let argument = match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(ty)) => Some(ty),
            _ => None,
        },
        _ => None,
    };
    Some((segment.ident.to_string(), argument))
}

/// `T` when `ty` is `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    match last_segment(ty)? {
        (name, Some(inner)) if name == "Option" => Some(inner),
        _ => None,
    }
}

/// Whether `ty` is a unique identifier, possibly optional or boxed.
pub(crate) fn is_uuid(ty: &Type) -> bool {
    match last_segment(ty) {
        Some((name, None)) => name == "Uuid",
        Some((name, Some(inner))) if name == "Option" || name == "Box" || name == "Arc" => {
            is_uuid(inner)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_uuid, option_inner};
    use quote::ToTokens;
    use syn::{Type, parse_quote};

    #[test]
    fn optional() {
        let ty: Type = parse_quote!(Option<String>);
        assert_eq!(
            option_inner(&ty).map(|v| v.to_token_stream().to_string()),
            Some("String".into())
        );
        let ty: Type = parse_quote!(::std::option::Option<Box<i64>>);
        assert!(option_inner(&ty).is_some());
        let ty: Type = parse_quote!(Vec<String>);
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn identifiers() {
        assert!(is_uuid(&parse_quote!(Uuid)));
        assert!(is_uuid(&parse_quote!(uuid::Uuid)));
        assert!(is_uuid(&parse_quote!(Option<uuid::Uuid>)));
        assert!(!is_uuid(&parse_quote!(String)));
        assert!(!is_uuid(&parse_quote!(Vec<Uuid>)));
    }
}
