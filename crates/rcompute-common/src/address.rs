//! Operation Addresses
//!
//! Every remote operation is identified by the type that owns it and the
//! member name, e.g. `Rhino.Geometry.Curve` + `Offset`. The compute service
//! exposes each one as a lowercase REST path:
//!
//! ```text
//! Rhino.Geometry.Curve / Offset      ->  /rhino/geometry/curve/offset
//! Rhino.Geometry.Mesh / CreateFromBrep (Brep)
//!                                    ->  /rhino/geometry/mesh/createfrombrep-brep
//! ```
//!
//! Overloaded members are disambiguated by appending the parameter type
//! names, joined with `_`, after a `-`.

use std::fmt;

/// Query string that switches an endpoint into batch mode.
pub const MULTIPLE_QUERY: &str = "?multiple=true";

/// A normalized REST path for one remote operation.
///
/// Always begins with `/` and is entirely lowercase.
///
/// # Example
///
/// ```
/// use rcompute_common::OperationAddress;
///
/// let addr = OperationAddress::new("Rhino.Geometry.Curve", "Offset");
/// assert_eq!(addr.as_str(), "/rhino/geometry/curve/offset");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationAddress {
    path: String,
}

impl OperationAddress {
    /// Builds the address for `owner.member`.
    pub fn new(owner: &str, member: &str) -> Self {
        let owner = owner.trim_matches(|c: char| c == '.' || c == '/').replace('.', "/");
        Self::parse(&format!("{}/{}", owner, member))
    }

    /// Builds the address for a specific overload of `owner.member`.
    ///
    /// An empty `param_types` slice produces the plain address.
    ///
    /// # Example
    ///
    /// ```
    /// use rcompute_common::OperationAddress;
    ///
    /// let addr = OperationAddress::with_overload(
    ///     "Rhino.Geometry.SubD",
    ///     "JoinSubDs",
    ///     &["SubDArray", "double", "bool"],
    /// );
    /// assert_eq!(addr.as_str(), "/rhino/geometry/subd/joinsubds-subdarray_double_bool");
    /// ```
    pub fn with_overload(owner: &str, member: &str, param_types: &[&str]) -> Self {
        if param_types.is_empty() {
            return Self::new(owner, member);
        }
        let member = format!("{}-{}", member, param_types.join("_"));
        Self::new(owner, &member)
    }

    /// Normalizes an already-formed path: forces a single leading slash and
    /// lowercases it.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_start_matches('/');
        Self {
            path: format!("/{}", trimmed.to_lowercase()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Joins this address onto `base_address`.
    ///
    /// A trailing slash on the base is dropped so the result never contains
    /// `//` between the host and the path.
    pub fn url(&self, base_address: &str, multiple: bool) -> String {
        let base = base_address.trim_end_matches('/');
        if multiple {
            format!("{}{}{}", base, self.path, MULTIPLE_QUERY)
        } else {
            format!("{}{}", base, self.path)
        }
    }
}

impl fmt::Display for OperationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for OperationAddress {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for OperationAddress {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&OperationAddress> for OperationAddress {
    fn from(addr: &OperationAddress) -> Self {
        addr.clone()
    }
}

/// Shorthand for [`OperationAddress::new`].
pub fn build_address(owner: &str, member: &str) -> OperationAddress {
    OperationAddress::new(owner, member)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_address_lowercases() {
        let addr = build_address("Rhino.Geometry.Curve", "Offset");
        assert_eq!(addr.as_str(), "/rhino/geometry/curve/offset");
    }

    #[test]
    fn test_build_address_case_insensitive() {
        let a = build_address("rhino.geometry.curve", "offset");
        let b = build_address("RHINO.GEOMETRY.CURVE", "OFFSET");
        let c = build_address("Rhino.Geometry.Curve", "Offset");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_overload_suffix() {
        let addr = OperationAddress::with_overload("Rhino.Geometry.Mesh", "CreateFromBrep", &["Brep"]);
        assert_eq!(addr.as_str(), "/rhino/geometry/mesh/createfrombrep-brep");
    }

    #[test]
    fn test_overload_empty_is_plain() {
        let addr = OperationAddress::with_overload("Rhino.Geometry.SubD", "ToBrep", &[]);
        assert_eq!(addr, build_address("Rhino.Geometry.SubD", "ToBrep"));
    }

    #[test]
    fn test_parse_enforces_leading_slash() {
        assert_eq!(OperationAddress::parse("Rhino/Geometry/Brep/Split").as_str(), "/rhino/geometry/brep/split");
        assert_eq!(OperationAddress::parse("//rhino/a").as_str(), "/rhino/a");
        assert_eq!(OperationAddress::from("/already/ok").as_str(), "/already/ok");
    }

    #[test]
    fn test_owner_with_stray_separators() {
        let addr = build_address(".Rhino.Geometry.Brep.", "Split");
        assert_eq!(addr.as_str(), "/rhino/geometry/brep/split");
    }

    #[test]
    fn test_url_joins_base() {
        let addr = build_address("Rhino.Geometry.Curve", "Offset");
        assert_eq!(
            addr.url("https://compute.rhino3d.com/", false),
            "https://compute.rhino3d.com/rhino/geometry/curve/offset"
        );
        assert_eq!(
            addr.url("http://127.0.0.1:8081", true),
            "http://127.0.0.1:8081/rhino/geometry/curve/offset?multiple=true"
        );
    }

    #[test]
    fn test_display() {
        let addr = build_address("Rhino.Geometry.Intersect.Intersection", "CurveCurve");
        assert_eq!(addr.to_string(), "/rhino/geometry/intersect/intersection/curvecurve");
    }
}
