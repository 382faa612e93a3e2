//! Reading point measurements from ESRI shapefiles

use crate::error::{Error, Result};
use crate::vector::{Sample, SampleSet};
use shapefile::dbase::{self, FieldValue};
use shapefile::Shape;
use std::path::Path;
use tracing::debug;

/// Something that yields point samples for one named attribute
pub trait PointSource {
    /// Read every point and the value of `attribute` at it
    fn read_points(&self, path: &Path, attribute: &str) -> Result<SampleSet>;
}

/// [`PointSource`] backed by `.shp` + `.dbf` files
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapefileSource;

impl PointSource for ShapefileSource {
    fn read_points(&self, path: &Path, attribute: &str) -> Result<SampleSet> {
        read_point_shapefile(path, attribute)
    }
}

/// Read a point shapefile, taking `attribute` as the sample value.
///
/// The bounding box is the extent of the points. Fails with
/// [`Error::UnknownAttribute`] when the attribute table has no such field,
/// and with [`Error::UnsupportedGeometry`] on any non-point record.
pub fn read_point_shapefile<P: AsRef<Path>>(path: P, attribute: &str) -> Result<SampleSet> {
    let path = path.as_ref();

    let fields = field_names(&path.with_extension("dbf"))?;
    if !fields.iter().any(|f| f == attribute) {
        return Err(Error::UnknownAttribute {
            name: attribute.to_string(),
            available: fields,
        });
    }

    let mut reader = shapefile::Reader::from_path(path)?;
    let mut samples = Vec::new();
    for shape_record in reader.iter_shapes_and_records() {
        let (shape, record) = shape_record?;
        let (lon, lat) = point_xy(&shape)?;
        let value = match record.get(attribute) {
            Some(v) => numeric_value(attribute, v)?,
            None => {
                return Err(Error::UnknownAttribute {
                    name: attribute.to_string(),
                    available: fields,
                })
            }
        };
        samples.push(Sample::new(lat, lon, value));
    }

    debug!("Read {} points from {}", samples.len(), path.display());

    SampleSet::from_samples(samples).ok_or(Error::InsufficientPoints {
        required: 1,
        found: 0,
    })
}

fn field_names(dbf: &Path) -> Result<Vec<String>> {
    let reader = dbase::Reader::from_path(dbf)
        .map_err(|e| Error::Source(format!("{}: {}", dbf.display(), e)))?;
    Ok(reader
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .filter(|name| name != "DeletionFlag")
        .collect())
}

fn point_xy(shape: &Shape) -> Result<(f64, f64)> {
    match shape {
        Shape::Point(p) => Ok((p.x, p.y)),
        Shape::PointM(p) => Ok((p.x, p.y)),
        Shape::PointZ(p) => Ok((p.x, p.y)),
        other => Err(Error::UnsupportedGeometry(format!(
            "{:?} record in a point file",
            other.shapetype()
        ))),
    }
}

/// Interpret a dBase field as a number
fn numeric_value(name: &str, value: &FieldValue) -> Result<f64> {
    let invalid = || Error::InvalidAttributeValue {
        name: name.to_string(),
        value: format!("{:?}", value),
    };
    match value {
        FieldValue::Numeric(Some(v)) => Ok(*v),
        FieldValue::Float(Some(v)) => Ok(*v as f64),
        FieldValue::Integer(v) => Ok(*v as f64),
        FieldValue::Double(v) => Ok(*v),
        FieldValue::Currency(v) => Ok(*v),
        FieldValue::Character(Some(s)) => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_numeric_value() {
        assert_eq!(numeric_value("V", &FieldValue::Numeric(Some(2.5))).unwrap(), 2.5);
        assert_eq!(numeric_value("V", &FieldValue::Integer(-4)).unwrap(), -4.0);
        assert_eq!(numeric_value("V", &FieldValue::Double(1e3)).unwrap(), 1000.0);
        assert_eq!(
            numeric_value("V", &FieldValue::Character(Some(" 12.5 ".into()))).unwrap(),
            12.5
        );
    }

    #[test]
    fn test_non_numeric_value() {
        let err = numeric_value("V", &FieldValue::Character(Some("deep".into()))).unwrap_err();
        assert!(matches!(err, Error::InvalidAttributeValue { .. }));
        assert_eq!(err.kind(), ErrorKind::Data);
        assert!(numeric_value("V", &FieldValue::Numeric(None)).is_err());
        assert!(numeric_value("V", &FieldValue::Logical(Some(true))).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_point_shapefile("/nonexistent/points.shp", "V").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
