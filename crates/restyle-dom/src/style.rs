//! Inline `style` attribute declarations.

/// Parse `a: b; c: d` into ordered `(property, value)` pairs.
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

pub fn serialize_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(k, v)| format!("{}: {};", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Value of `property` in `style`, empty when unset.
pub fn get_property(style: &str, property: &str) -> String {
    parse_declarations(style)
        .into_iter()
        .rev()
        .find(|(k, _)| k == property)
        .map(|(_, v)| v)
        .unwrap_or_default()
}

/// `style` with `property` set to `value`; an empty value removes it.
pub fn set_property(style: &str, property: &str, value: &str) -> String {
    let mut decls = parse_declarations(style);
    decls.retain(|(k, _)| k != property);
    if !value.is_empty() {
        decls.push((property.to_string(), value.to_string()));
    }
    serialize_declarations(&decls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_property() {
        let style = "width: 50%; --GBL01A: #000000";
        assert_eq!(get_property(style, "width"), "50%");
        assert_eq!(get_property(style, "--GBL01A"), "#000000");
        assert_eq!(get_property(style, "margin"), "");
    }

    #[test]
    fn test_set_property_replaces() {
        let style = set_property("width: 50%; margin: 4px", "width", "100%");
        assert_eq!(style, "margin: 4px; width: 100%;");
        assert_eq!(get_property(&style, "width"), "100%");
    }

    #[test]
    fn test_set_empty_removes() {
        assert_eq!(set_property("width: 50%;", "width", ""), "");
    }

    #[test]
    fn test_custom_property_case_sensitive() {
        let style = set_property("", "--GBL01A", "#000000");
        assert_eq!(get_property(&style, "--gbl01a"), "");
    }
}
