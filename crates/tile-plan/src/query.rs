//! AFL query emission.
//!
//! One query per tile:
//!
//! ```text
//! store(reshape(slice(<source>,<Z>,<slice>),<schema>[J=<x0>:<x1>,<n>,0,I=<y0>:<y1>,<n>,0]),<target>)
//! ```
//!
//! The text is consumed by SciDB as-is, so the layout here is bit-exact.

use crate::plan::{TilePlan, CHUNK_OVERLAP};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One attribute of an array schema, e.g. `oid:int64 NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
}

impl AttributeSpec {
    pub fn new(name: &str, type_name: &str, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            nullable,
        }
    }
}

impl fmt::Display for AttributeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.type_name)?;
        if self.nullable {
            f.write_str(" NULL")?;
        }
        Ok(())
    }
}

/// Attribute part of the destination schema.
///
/// Either a structured attribute list or a literal `<...>` string that is
/// emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSpec {
    Raw(String),
    Attributes(Vec<AttributeSpec>),
}

impl SchemaSpec {
    pub fn raw(literal: impl Into<String>) -> Self {
        SchemaSpec::Raw(literal.into())
    }

    /// Attributes of the SS-DB `normal_obs` array.
    pub fn normal_obs() -> Self {
        SchemaSpec::Attributes(vec![
            AttributeSpec::new("oid", "int64", true),
            AttributeSpec::new("center", "bool", true),
            AttributeSpec::new("polygon", "int32", true),
            AttributeSpec::new("sumPixel", "int64", true),
            AttributeSpec::new("avgDist", "double", true),
            AttributeSpec::new("point", "bool", true),
        ])
    }
}

impl Default for SchemaSpec {
    fn default() -> Self {
        Self::normal_obs()
    }
}

impl fmt::Display for SchemaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSpec::Raw(literal) => f.write_str(literal),
            SchemaSpec::Attributes(attrs) => {
                f.write_str("<")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", attr)?;
                }
                f.write_str(">")
            }
        }
    }
}

/// A dimension descriptor `NAME=lo:hi,chunk,overlap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionSpec<'a> {
    pub name: &'a str,
    pub lower: i64,
    pub upper: i64,
    pub chunk: i64,
    pub overlap: i64,
}

impl fmt::Display for DimensionSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}:{},{},{}",
            self.name, self.lower, self.upper, self.chunk, self.overlap
        )
    }
}

/// The array being split and the identifiers used to address it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceArray {
    pub name: String,
    /// Dimension fixed by `slice` (the observation cycle)
    pub slice_dimension: String,
    /// Destination dimension for the X axis
    pub x_dimension: String,
    /// Destination dimension for the Y axis
    pub y_dimension: String,
    pub schema: SchemaSpec,
}

impl Default for SourceArray {
    fn default() -> Self {
        Self {
            name: "normal_obs".to_string(),
            slice_dimension: "Z".to_string(),
            x_dimension: "J".to_string(),
            y_dimension: "I".to_string(),
            schema: SchemaSpec::default(),
        }
    }
}

impl SourceArray {
    pub fn x_dimension_for<'a>(&'a self, plan: &TilePlan) -> DimensionSpec<'a> {
        DimensionSpec {
            name: &self.x_dimension,
            lower: plan.lower_x,
            upper: plan.upper_x,
            chunk: plan.edge_x,
            overlap: CHUNK_OVERLAP,
        }
    }

    pub fn y_dimension_for<'a>(&'a self, plan: &TilePlan) -> DimensionSpec<'a> {
        DimensionSpec {
            name: &self.y_dimension,
            lower: plan.lower_y,
            upper: plan.upper_y,
            chunk: plan.edge_y,
            overlap: CHUNK_OVERLAP,
        }
    }
}

/// Render the `store(reshape(slice(...)))` query for one tile.
pub fn render_query(plan: &TilePlan, source: &SourceArray) -> String {
    format!(
        "store(reshape(slice({},{},{}),{}[{},{}]),{})",
        source.name,
        source.slice_dimension,
        plan.slice_index,
        source.schema,
        source.x_dimension_for(plan),
        source.y_dimension_for(plan),
        plan.target_array_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TileDescriptor;
    use crate::plan::{compute_plan, TileEdge};

    const NORMAL_OBS_SCHEMA: &str = "<oid:int64 NULL,center:bool NULL,polygon:int32 NULL,sumPixel:int64 NULL,avgDist:double NULL,point:bool NULL>";

    fn plan(x: i64, y: i64, z: i64, n: i64) -> TilePlan {
        compute_plan(&TileDescriptor::new(x, y, z), TileEdge::new(n).unwrap()).unwrap()
    }

    #[test]
    fn test_default_schema_text() {
        assert_eq!(SchemaSpec::default().to_string(), NORMAL_OBS_SCHEMA);
    }

    #[test]
    fn test_attribute_not_null() {
        assert_eq!(AttributeSpec::new("v", "float", false).to_string(), "v:float");
    }

    #[test]
    fn test_dimension_spec_text() {
        let source = SourceArray::default();
        let p = plan(-10, 0, 5, 100);
        assert_eq!(source.x_dimension_for(&p).to_string(), "J=-10:89,100,0");
        assert_eq!(source.y_dimension_for(&p).to_string(), "I=0:99,100,0");
    }

    #[test]
    fn test_render_first_sample_tile() {
        let query = render_query(&plan(490205, 507962, 0, 7500), &SourceArray::default());
        assert_eq!(
            query,
            format!(
                "store(reshape(slice(normal_obs,Z,0),{}[J=490205:497704,7500,0,I=507962:515461,7500,0]),normal_obs_0)",
                NORMAL_OBS_SCHEMA
            )
        );
    }

    #[test]
    fn test_raw_schema_emitted_verbatim() {
        let source = SourceArray {
            schema: SchemaSpec::raw("<v:double>"),
            ..SourceArray::default()
        };
        let query = render_query(&plan(0, 0, 1, 2), &source);
        assert_eq!(
            query,
            "store(reshape(slice(normal_obs,Z,1),<v:double>[J=0:1,2,0,I=0:1,2,0]),normal_obs_1)"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let p = plan(495230, 488864, 1, 7500);
        let source = SourceArray::default();
        assert_eq!(render_query(&p, &source), render_query(&p, &source));
    }

    #[test]
    fn test_schema_from_yaml_forms() {
        let raw: SchemaSpec = serde_yaml::from_str("\"<a:int64>\"").unwrap();
        assert_eq!(raw.to_string(), "<a:int64>");

        let listed: SchemaSpec = serde_yaml::from_str(
            "- name: a\n  type: int64\n  nullable: true\n- name: b\n  type: bool\n",
        )
        .unwrap();
        assert_eq!(listed.to_string(), "<a:int64 NULL,b:bool>");
    }
}
