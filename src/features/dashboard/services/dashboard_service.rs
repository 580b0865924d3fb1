use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::*;
use crate::shared::constants::{
    INSPECTION_RESULTS, SDR_STATUSES, SMS_SEVERITIES, STOCK_STATUSES, TRAINING_EXPIRY_WINDOW_DAYS,
};

/// Service for the back-office dashboard aggregates
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummaryDto> {
        let totals = self.totals().await?;

        let stock_by_status = with_known_keys(
            STOCK_STATUSES,
            self.count_by("stock_inventory", "status").await?,
        );
        let inspections_by_result = with_known_keys(
            INSPECTION_RESULTS,
            self.count_by("incoming_inspections", "result").await?,
        );
        let sdr_by_status =
            with_known_keys(SDR_STATUSES, self.count_by("sdr_reports", "status").await?);
        let sms_by_severity = with_known_keys(
            SMS_SEVERITIES,
            self.count_by("sms_reports", "severity").await?,
        );

        Ok(DashboardSummaryDto {
            totals,
            stock_by_status,
            inspections_by_result,
            sdr_by_status,
            sms_by_severity,
            utilization_by_aircraft: self.utilization_by_aircraft().await?,
            expiring_trainings: self.expiring_trainings(TRAINING_EXPIRY_WINDOW_DAYS).await?,
            expiry_window_days: TRAINING_EXPIRY_WINDOW_DAYS,
        })
    }

    async fn totals(&self) -> Result<RecordTotalsDto> {
        sqlx::query_as::<_, RecordTotalsDto>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM flight_records) AS flight_records,
                (SELECT COUNT(*) FROM airport_ids) AS airports,
                (SELECT COUNT(*) FROM stock_inventory) AS stock_items,
                (SELECT COUNT(*) FROM incoming_inspections) AS incoming_inspections,
                (SELECT COUNT(*) FROM sdr_reports) AS sdr_reports,
                (SELECT COUNT(*) FROM sms_reports) AS sms_reports,
                (SELECT COUNT(*) FROM technician_trainings) AS technician_trainings,
                (SELECT COUNT(*) FROM document_files) AS document_files,
                (SELECT COUNT(*) FROM technical_queries) AS technical_queries,
                (SELECT COUNT(*) FROM technician_trainings
                 WHERE expiry_date < CURRENT_DATE) AS expired_trainings
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get dashboard totals: {:?}", e);
            AppError::Database(e)
        })
    }

    /// `table` and `column` are always literals from this module
    async fn count_by(&self, table: &'static str, column: &'static str) -> Result<Vec<GroupCountDto>> {
        let rows = sqlx::query_as::<_, GroupCountDto>(&format!(
            "SELECT {column} AS key, COUNT(*) AS count FROM {table} GROUP BY {column} ORDER BY {column}",
            column = column,
            table = table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count {} by {}: {:?}", table, column, e);
            AppError::Database(e)
        })?;

        Ok(rows)
    }

    async fn utilization_by_aircraft(&self) -> Result<Vec<AircraftUtilizationDto>> {
        let rows = sqlx::query_as::<_, AircraftUtilizationDto>(
            r#"
            SELECT
                aircraft_registration,
                COUNT(*) AS flights,
                COALESCE(SUM(block_hours), 0) AS block_hours,
                COALESCE(SUM(cycles), 0)::BIGINT AS cycles
            FROM flight_records
            GROUP BY aircraft_registration
            ORDER BY block_hours DESC, aircraft_registration
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn expiring_trainings(&self, window_days: i64) -> Result<Vec<ExpiringTrainingDto>> {
        let rows = sqlx::query_as::<_, ExpiringTrainingDto>(
            r#"
            SELECT id, technician_name, course_name, expiry_date,
                   (expiry_date - CURRENT_DATE)::INT AS days_left
            FROM technician_trainings
            WHERE expiry_date >= CURRENT_DATE
              AND expiry_date <= CURRENT_DATE + $1::INT
            ORDER BY expiry_date, technician_name
            "#,
        )
        .bind(window_days as i32)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Lay out group counts in the canonical order of `known`, with zero for
/// missing keys. Keys outside `known` follow in their original order.
fn with_known_keys(known: &[&str], counts: Vec<GroupCountDto>) -> Vec<GroupCountDto> {
    let mut ordered: Vec<GroupCountDto> = known
        .iter()
        .map(|key| GroupCountDto {
            key: key.to_string(),
            count: counts
                .iter()
                .find(|c| c.key == *key)
                .map_or(0, |c| c.count),
        })
        .collect();

    ordered.extend(counts.into_iter().filter(|c| !known.contains(&c.key.as_str())));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(key: &str, count: i64) -> GroupCountDto {
        GroupCountDto {
            key: key.to_string(),
            count,
        }
    }

    #[test]
    fn test_with_known_keys_fills_zeroes_in_order() {
        let result = with_known_keys(
            SDR_STATUSES,
            vec![count("closed", 4), count("draft", 2)],
        );
        assert_eq!(
            result,
            vec![count("draft", 2), count("submitted", 0), count("closed", 4)]
        );
    }

    #[test]
    fn test_with_known_keys_keeps_unexpected_values() {
        let result = with_known_keys(&["pending", "accepted"], vec![count("legacy", 1)]);
        assert_eq!(
            result,
            vec![count("pending", 0), count("accepted", 0), count("legacy", 1)]
        );
    }
}
