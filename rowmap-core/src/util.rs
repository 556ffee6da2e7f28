pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}

/// Largest char boundary of `value` not past `index`.
pub fn floor_char_boundary(value: &str, index: usize) -> usize {
    if index >= value.len() {
        return value.len();
    }
    (0..=index)
        .rev()
        .find(|&i| value.is_char_boundary(i))
        .unwrap_or_default()
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$crate::floor_char_boundary(&$query, 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

#[cfg(test)]
mod tests {
    use super::{floor_char_boundary, separated_by};

    #[test]
    fn separator_only_between_written_items() {
        let mut out = String::from("SET ");
        separated_by(&mut out, ["a", "", "b"], |out, v| out.push_str(v), ", ");
        assert_eq!(out, "SET a, b");
    }

    #[test]
    fn truncation() {
        let long = "x".repeat(600);
        let text = format!("{}", truncate_long!(long));
        assert_eq!(text.len(), 500);
        assert!(text.ends_with("..."));
        assert_eq!(format!("{}", truncate_long!("short")), "short");
    }

    #[test]
    fn truncation_multi_byte() {
        let long = "é".repeat(300);
        let text = format!("{}", truncate_long!(long));
        assert_eq!(text, format!("{}...", "é".repeat(248)));
        assert_eq!(floor_char_boundary(&long, 497), 496);
        assert_eq!(floor_char_boundary("abc", 10), 3);
        assert_eq!(floor_char_boundary("é", 1), 0);
    }
}
