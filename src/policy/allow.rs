use spdx::{Expression, LicenseReq, ParseError};

/// Predicate deciding whether a declared license expression is covered by
/// the configured allow expression.
///
/// Expression parsing and matching are delegated to the `spdx` crate: the
/// allow expression is parsed once and every license requirement it names
/// becomes part of the allowed set. A dependency expression passes when it
/// evaluates to true with exactly that set granted.
#[derive(Debug, Clone)]
pub struct AllowPolicy {
    expression: String,
    allowed: Vec<LicenseReq>,
}

impl AllowPolicy {
    pub fn parse(expression: &str) -> Result<Self, ParseError> {
        let parsed = Expression::parse(expression)?;
        let allowed = parsed
            .requirements()
            .map(|requirement| requirement.req.clone())
            .collect();
        Ok(Self {
            expression: expression.to_string(),
            allowed,
        })
    }

    /// The raw allow expression this policy was built from.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether `license_name` is a syntactically valid license expression
    /// satisfied by this policy. Unparsable expressions are never permitted.
    pub fn permits(&self, license_name: &str) -> bool {
        match Expression::parse(license_name) {
            Ok(expression) => {
                expression.evaluate(|requirement| self.allowed.contains(requirement))
            }
            Err(_) => false,
        }
    }
}
