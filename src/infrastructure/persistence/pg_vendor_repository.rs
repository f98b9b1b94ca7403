//! PostgreSQL implementation of the vendor repository.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{FulfillmentModes, OperatingHours, VendorCandidate};
use crate::domain::geo::Coordinate;
use crate::domain::repositories::VendorRepository;
use crate::domain::service_area::ServiceArea;
use crate::error::AppError;

const VENDOR_COLUMNS: &str = r#"
    id, name, slug, logo_url, description, phone, email, address,
    latitude, longitude, service_areas, fulfillment_modes, operating_hours,
    minimum_order, service_radius_km, approved
"#;

/// Raw `vendors` row. The JSONB columns are free-form and decoded leniently
/// in [`VendorRow::into_candidate`].
#[derive(Debug, sqlx::FromRow)]
struct VendorRow {
    id: i64,
    name: String,
    slug: Option<String>,
    logo_url: Option<String>,
    description: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    service_areas: Option<Value>,
    fulfillment_modes: Option<Value>,
    operating_hours: Option<Value>,
    minimum_order: f64,
    service_radius_km: Option<f64>,
    approved: bool,
}

impl VendorRow {
    fn into_candidate(self) -> VendorCandidate {
        let coordinate = Coordinate::from_parts(self.latitude, self.longitude);
        if coordinate.is_none() && (self.latitude.is_some() || self.longitude.is_some()) {
            tracing::debug!(vendor_id = self.id, "Ignoring incomplete or invalid vendor location");
        }

        let service_area = self.service_areas.as_ref().and_then(ServiceArea::from_json);
        if let Some(area) = &service_area
            && area.rejected_entries() > 0
        {
            tracing::debug!(
                vendor_id = self.id,
                rejected = area.rejected_entries(),
                usable = area.codes().len(),
                "Service area has entries without a postal code"
            );
        }

        VendorCandidate {
            id: self.id,
            name: self.name,
            slug: self.slug,
            logo_url: self.logo_url,
            description: self.description,
            phone: self.phone,
            email: self.email,
            address: self.address,
            coordinate,
            service_area,
            fulfillment: self
                .fulfillment_modes
                .as_ref()
                .map(FulfillmentModes::from_json)
                .unwrap_or_default(),
            hours: self
                .operating_hours
                .as_ref()
                .map(OperatingHours::from_json)
                .unwrap_or_default(),
            minimum_order: self.minimum_order,
            service_radius_km: self.service_radius_km.filter(|r| r.is_finite() && *r > 0.0),
            approved: self.approved,
        }
    }
}

/// PostgreSQL repository for approved-vendor reads.
pub struct PgVendorRepository {
    pool: Arc<PgPool>,
}

impl PgVendorRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VendorRepository for PgVendorRepository {
    async fn fetch_approved(
        &self,
        require_coordinates: bool,
    ) -> Result<Vec<VendorCandidate>, AppError> {
        let sql = format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors \
             WHERE approved \
             AND (NOT $1 OR (latitude IS NOT NULL AND longitude IS NOT NULL)) \
             ORDER BY id"
        );

        let rows = sqlx::query_as::<_, VendorRow>(&sql)
            .bind(require_coordinates)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(VendorRow::into_candidate).collect())
    }

    async fn find_approved(&self, id: i64) -> Result<Option<VendorCandidate>, AppError> {
        let sql = format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = $1 AND approved");

        let row = sqlx::query_as::<_, VendorRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(VendorRow::into_candidate))
    }

    async fn count_approved(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vendors WHERE approved")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FulfillmentMode;
    use serde_json::json;

    fn row() -> VendorRow {
        VendorRow {
            id: 3,
            name: "Tortillería".to_string(),
            slug: Some("tortilleria".to_string()),
            logo_url: None,
            description: None,
            phone: None,
            email: None,
            address: None,
            latitude: Some(19.35),
            longitude: Some(-99.16),
            service_areas: Some(json!(["atoyac-03310", 6700, "junk"])),
            fulfillment_modes: Some(json!({"pickup": true, "delivery": true})),
            operating_hours: None,
            minimum_order: 150.0,
            service_radius_km: Some(5.0),
            approved: true,
        }
    }

    #[test]
    fn test_row_maps_to_candidate() {
        let candidate = row().into_candidate();

        assert_eq!(candidate.id, 3);
        assert_eq!(candidate.coordinate, Some(Coordinate::new(19.35, -99.16)));
        let area = candidate.usable_service_area().unwrap();
        assert_eq!(area.codes().len(), 2);
        assert_eq!(area.rejected_entries(), 1);
        assert!(candidate.fulfillment.supports(FulfillmentMode::Delivery));
        assert!(candidate.hours.is_empty());
        assert_eq!(candidate.service_radius_km, Some(5.0));
    }

    #[test]
    fn test_row_with_partial_location_has_no_coordinate() {
        let mut r = row();
        r.longitude = None;
        assert!(r.into_candidate().coordinate.is_none());

        let mut r = row();
        r.latitude = Some(123.0);
        assert!(r.into_candidate().coordinate.is_none());
    }

    #[test]
    fn test_row_with_malformed_json_columns() {
        let mut r = row();
        r.service_areas = Some(json!("not json ["));
        r.fulfillment_modes = Some(json!(42));
        r.service_radius_km = Some(-3.0);

        let candidate = r.into_candidate();
        assert!(candidate.usable_service_area().is_none());
        assert_eq!(candidate.fulfillment, FulfillmentModes::default());
        assert_eq!(candidate.service_radius_km, None);
    }
}
