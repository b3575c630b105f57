//! Syntactic attribute classification.
//!
//! Binding attributes are recognized purely from the attribute's literal
//! name and the enclosing tag's name; there is no registry and no semantic
//! lookup. Classification is recomputed per attribute.

/// How an attribute's value should be lexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeClassification {
    /// Ordinary markup attribute; value lexed as markup (with interpolation).
    Regular,
    /// `(name)` or `on-name`: event binding, value is an expression.
    EventBinding,
    /// `[name]` or `bind-name`: property binding, value is an expression.
    PropertyBinding,
    /// `[(name)]` or `bindon-name`: two-way binding, value is an expression.
    TwoWayBinding,
    /// `*name`, or `let-name` on a template tag: microsyntax bindings,
    /// value is an expression.
    TemplateBindings,
}

/// Classify an attribute by its literal name and the enclosing tag name.
///
/// The two-way form `[(x)]` is checked before the event `(x)` and property
/// `[x]` forms it overlaps with. Bracketed forms require the matching
/// closing marker and a non-empty inner name; canonical prefixes (`on-`,
/// `bind-`, `bindon-`) require a non-empty remainder. Everything else is
/// [`AttributeClassification::Regular`].
pub fn classify(attr_name: &str, tag_name: &str) -> AttributeClassification {
    if let Some(inner) = strip_wrapped(attr_name, "[(", ")]") {
        if !inner.is_empty() {
            return AttributeClassification::TwoWayBinding;
        }
    }
    if let Some(rest) = attr_name.strip_prefix("bindon-") {
        if !rest.is_empty() {
            return AttributeClassification::TwoWayBinding;
        }
    }
    if let Some(inner) = strip_wrapped(attr_name, "(", ")") {
        if !inner.is_empty() {
            return AttributeClassification::EventBinding;
        }
    }
    if let Some(rest) = attr_name.strip_prefix("on-") {
        if !rest.is_empty() {
            return AttributeClassification::EventBinding;
        }
    }
    if let Some(inner) = strip_wrapped(attr_name, "[", "]") {
        if !inner.is_empty() {
            return AttributeClassification::PropertyBinding;
        }
    }
    if let Some(rest) = attr_name.strip_prefix("bind-") {
        if !rest.is_empty() {
            return AttributeClassification::PropertyBinding;
        }
    }
    if let Some(rest) = attr_name.strip_prefix('*') {
        if !rest.is_empty() {
            return AttributeClassification::TemplateBindings;
        }
    }
    if let Some(rest) = attr_name.strip_prefix("let-") {
        if !rest.is_empty() && tag_name.eq_ignore_ascii_case("template") {
            return AttributeClassification::TemplateBindings;
        }
    }
    AttributeClassification::Regular
}

fn strip_wrapped<'a>(name: &'a str, open: &str, close: &str) -> Option<&'a str> {
    name.strip_prefix(open)?.strip_suffix(close)
}
