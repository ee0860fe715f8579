// ============================================================
// Layer 3 — Landmark Vector (Feature Pipeline)
// ============================================================
// A face mesh has 468 points, each with (x, y, z) coordinates.
// Flattened, that is exactly 1404 floats:
//
//   [x0, y0, z0, x1, y1, z1, ..., x467, y467, z467]
//
// The HTTP payload is untrusted, so validation works on a raw
// serde_json::Value instead of a typed struct. That way a
// missing key, a null, a string, or an array of the wrong size
// all end up as a LandmarkError the caller can turn into the
// "neutral" fallback, instead of a 4xx from the JSON extractor.

use serde_json::Value;
use thiserror::Error;

/// Number of points in one face mesh
pub const MESH_POINTS: usize = 468;

/// Coordinates per point (x, y, z)
pub const AXES: usize = 3;

/// Length of a flattened landmark vector: 468 × 3 = 1404
pub const LANDMARK_FEATURES: usize = MESH_POINTS * AXES;

/// Why a landmark payload was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("request has no 'landmarks' field")]
    Missing,

    #[error("'landmarks' must be an array")]
    NotAnArray,

    #[error("expected {expected} landmark values, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("landmark value at index {index} is not a finite number")]
    NotNumeric { index: usize },
}

/// A validated, fixed-length landmark vector.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkVector(Vec<f32>);

impl LandmarkVector {
    /// Validate an already-parsed slice of floats.
    pub fn from_values(values: Vec<f32>) -> Result<Self, LandmarkError> {
        if values.len() != LANDMARK_FEATURES {
            return Err(LandmarkError::WrongLength {
                expected: LANDMARK_FEATURES,
                actual:   values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(LandmarkError::NotNumeric { index });
        }
        Ok(Self(values))
    }

    /// Validate the `landmarks` field of a request body.
    ///
    /// `None` and `Some(Value::Null)` both count as missing.
    pub fn from_json(field: Option<&Value>) -> Result<Self, LandmarkError> {
        let array = match field {
            None | Some(Value::Null) => return Err(LandmarkError::Missing),
            Some(Value::Array(a))    => a,
            Some(_)                  => return Err(LandmarkError::NotAnArray),
        };

        // Check the length before converting so an oversized payload
        // is rejected without allocating a float buffer for it
        if array.len() != LANDMARK_FEATURES {
            return Err(LandmarkError::WrongLength {
                expected: LANDMARK_FEATURES,
                actual:   array.len(),
            });
        }

        let values = array
            .iter()
            .enumerate()
            .map(|(index, v)| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or(LandmarkError::NotNumeric { index })
            })
            .collect::<Result<Vec<f32>, _>>()?;

        Self::from_values(values)
    }

    /// Extract and validate `landmarks` from a whole request body.
    pub fn from_body(body: &Value) -> Result<Self, LandmarkError> {
        Self::from_json(body.get("landmarks"))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_1404_zeros() {
        let body = json!({ "landmarks": vec![0.0; 1404] });
        let v = LandmarkVector::from_body(&body).unwrap();
        assert_eq!(v.as_slice().len(), 1404);
    }

    #[test]
    fn test_rejects_short_vector() {
        let body = json!({ "landmarks": vec![0.5; 10] });
        assert_eq!(
            LandmarkVector::from_body(&body),
            Err(LandmarkError::WrongLength { expected: 1404, actual: 10 })
        );
    }

    #[test]
    fn test_rejects_long_vector() {
        let body = json!({ "landmarks": vec![0.5; 1405] });
        assert!(matches!(
            LandmarkVector::from_body(&body),
            Err(LandmarkError::WrongLength { actual: 1405, .. })
        ));
    }

    #[test]
    fn test_missing_and_null_are_missing() {
        assert_eq!(
            LandmarkVector::from_body(&json!({})),
            Err(LandmarkError::Missing)
        );
        assert_eq!(
            LandmarkVector::from_body(&json!({ "landmarks": null })),
            Err(LandmarkError::Missing)
        );
    }

    #[test]
    fn test_rejects_non_array() {
        let body = json!({ "landmarks": "1,2,3" });
        assert_eq!(LandmarkVector::from_body(&body), Err(LandmarkError::NotAnArray));
    }

    #[test]
    fn test_rejects_non_numeric_entry() {
        let mut values: Vec<Value> = vec![json!(0.1); 1404];
        values[7] = json!("x");
        let body = json!({ "landmarks": values });
        assert_eq!(
            LandmarkVector::from_body(&body),
            Err(LandmarkError::NotNumeric { index: 7 })
        );
    }

    #[test]
    fn test_integers_are_numbers() {
        let body = json!({ "landmarks": vec![1; 1404] });
        let v = LandmarkVector::from_body(&body).unwrap();
        assert!(v.as_slice().iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_from_values_rejects_nan() {
        let mut values = vec![0.0f32; 1404];
        values[3] = f32::NAN;
        assert_eq!(
            LandmarkVector::from_values(values),
            Err(LandmarkError::NotNumeric { index: 3 })
        );
    }
}
