//! Typed wrappers for a handful of geometry endpoints.
//!
//! Each wrapper names its endpoint, lays out the positional arguments, and
//! declares how many results come back. Geometry itself is opaque here: it
//! travels as [`Geometry`] (the JSON object the service produces) and is
//! never inspected.

use rcompute_common::{Argument, OperationAddress, Remote, Result};
use serde::{Deserialize, Serialize, Serializer};

use crate::client::ComputeClient;
use crate::transport::Transport;

/// Opaque serialized geometry (brep, curve, mesh, subd, ...).
pub type Geometry = serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3d {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

impl Point3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// How offset segments are joined at corners. Sent as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveOffsetCornerStyle {
    None,
    #[default]
    Sharp,
    Round,
    Smooth,
    Chamfer,
}

impl Serialize for CurveOffsetCornerStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let value = match self {
            CurveOffsetCornerStyle::None => 0,
            CurveOffsetCornerStyle::Sharp => 1,
            CurveOffsetCornerStyle::Round => 2,
            CurveOffsetCornerStyle::Smooth => 3,
            CurveOffsetCornerStyle::Chamfer => 4,
        };
        serializer.serialize_u8(value)
    }
}

pub mod mesh {
    use super::*;

    const OWNER: &str = "Rhino.Geometry.Mesh";

    /// Meshes every face of a brep with default meshing parameters.
    pub async fn create_from_brep<T: Transport>(
        client: &ComputeClient<T>,
        brep: &Remote<Geometry>,
    ) -> Result<Vec<Geometry>> {
        let addr = OperationAddress::with_overload(OWNER, "CreateFromBrep", &["Brep"]);
        client.call(addr, &[Argument::remote(brep)]).await
    }
}

pub mod curve {
    use super::*;

    const OWNER: &str = "Rhino.Geometry.Curve";

    pub async fn offset<T: Transport>(
        client: &ComputeClient<T>,
        curve: &Remote<Geometry>,
        plane: &Geometry,
        distance: f64,
        tolerance: f64,
        corner_style: CurveOffsetCornerStyle,
    ) -> Result<Vec<Geometry>> {
        let addr = OperationAddress::with_overload(
            OWNER,
            "Offset",
            &["curve", "plane", "double", "double", "curveoffsetcornerstyle"],
        );
        client
            .call(
                addr,
                &[
                    Argument::remote(curve),
                    Argument::plain(plane),
                    Argument::plain(&distance),
                    Argument::plain(&tolerance),
                    Argument::plain(&corner_style),
                ],
            )
            .await
    }

    /// Finds the curve parameter closest to `point`.
    ///
    /// Returns `(found, t)`.
    pub async fn closest_point<T: Transport>(
        client: &ComputeClient<T>,
        curve: &Remote<Geometry>,
        point: Point3d,
    ) -> Result<(bool, f64)> {
        let addr = OperationAddress::with_overload(OWNER, "ClosestPoint", &["curve", "point3d", "double"]);
        client
            .call2(addr, &[Argument::remote(curve), Argument::plain(&point)])
            .await
    }
}

pub mod brep {
    use super::*;

    const OWNER: &str = "Rhino.Geometry.Brep";

    /// Splits `brep` with `cutter`.
    ///
    /// Returns the pieces and whether the server had to raise the tolerance.
    pub async fn split<T: Transport>(
        client: &ComputeClient<T>,
        brep: &Remote<Geometry>,
        cutter: &Remote<Geometry>,
        intersection_tolerance: f64,
    ) -> Result<(Vec<Geometry>, bool)> {
        let addr = OperationAddress::with_overload(OWNER, "Split", &["brep", "brep", "double", "bool"]);
        client
            .call2(
                addr,
                &[
                    Argument::remote(brep),
                    Argument::remote(cutter),
                    Argument::plain(&intersection_tolerance),
                ],
            )
            .await
    }
}

pub mod intersection {
    use super::*;

    const OWNER: &str = "Rhino.Geometry.Intersect.Intersection";

    /// Intersects a curve with a brep.
    ///
    /// Returns `(success, overlap_curves, intersection_points)`.
    pub async fn curve_brep<T: Transport>(
        client: &ComputeClient<T>,
        curve: &Remote<Geometry>,
        brep: &Remote<Geometry>,
        tolerance: f64,
    ) -> Result<(bool, Vec<Geometry>, Vec<Point3d>)> {
        let addr = OperationAddress::with_overload(
            OWNER,
            "CurveBrep",
            &["curve", "brep", "double", "curvearray", "point3darray"],
        );
        client
            .call3(
                addr,
                &[Argument::remote(curve), Argument::remote(brep), Argument::plain(&tolerance)],
            )
            .await
    }
}

pub mod subd {
    use super::*;

    const OWNER: &str = "Rhino.Geometry.SubD";

    /// Joins SubDs into as few results as possible.
    pub async fn join_subds<T: Transport>(
        client: &ComputeClient<T>,
        subds: Vec<Geometry>,
        tolerance: f64,
        joined_edges_are_creases: bool,
    ) -> Result<Vec<Geometry>> {
        let addr = OperationAddress::with_overload(OWNER, "JoinSubDs", &["subdarray", "double", "bool"]);
        client
            .call(
                addr,
                &[
                    Argument::plain(&subds),
                    Argument::plain(&tolerance),
                    Argument::plain(&joined_edges_are_creases),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_point3d_wire_shape() {
        let value = serde_json::to_value(Point3d::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(value, json!({"X": 1.0, "Y": 2.0, "Z": 3.0}));
    }

    #[test]
    fn test_corner_style_is_integer() {
        assert_eq!(serde_json::to_value(CurveOffsetCornerStyle::Round).unwrap(), json!(2));
        assert_eq!(serde_json::to_value(CurveOffsetCornerStyle::default()).unwrap(), json!(1));
    }
}
