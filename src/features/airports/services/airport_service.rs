use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::airports::dtos::{
    AirportQueryParams, AirportResponseDto, CreateAirportDto, UpdateAirportDto,
};
use crate::features::airports::models::Airport;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::{ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE, ENTITY_AIRPORT};
use crate::shared::search::{build_search_query, SearchLimits, TextFilters};

const AIRPORT_COLUMNS: &str = "id, code, name, city, country, created_at, updated_at";

const DUPLICATE_CODE: &str = "Airport code already exists";

/// Service for the airport identifier registry
pub struct AirportService {
    pool: PgPool,
    limits: SearchLimits,
    activity: Arc<ActivityService>,
}

impl AirportService {
    pub fn new(pool: PgPool, limits: SearchLimits, activity: Arc<ActivityService>) -> Self {
        Self {
            pool,
            limits,
            activity,
        }
    }

    pub async fn create(
        &self,
        dto: CreateAirportDto,
        user: &AuthenticatedUser,
    ) -> Result<AirportResponseDto> {
        let airport = sqlx::query_as::<_, Airport>(&format!(
            r#"
            INSERT INTO airport_ids (code, name, city, country)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            AIRPORT_COLUMNS
        ))
        .bind(&dto.code)
        .bind(dto.name.trim())
        .bind(&dto.city)
        .bind(&dto.country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_CODE))?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_AIRPORT, airport.id)
                    .details(airport.code.clone()),
            )
            .await;

        Ok(airport.into())
    }

    pub async fn search(&self, params: &AirportQueryParams) -> Result<Vec<AirportResponseDto>> {
        let filters = TextFilters::new()
            .with("code", params.code.as_deref())
            .with("name", params.name.as_deref())
            .with("city", params.city.as_deref())
            .with("country", params.country.as_deref());

        let mut qb = build_search_query(
            AIRPORT_COLUMNS,
            "airport_ids",
            &filters,
            "created_at DESC",
            self.limits,
        );

        let airports: Vec<Airport> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(airports.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<AirportResponseDto> {
        sqlx::query_as::<_, Airport>(&format!(
            "SELECT {} FROM airport_ids WHERE id = $1",
            AIRPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Airport {} not found", id)))
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateAirportDto,
        user: &AuthenticatedUser,
    ) -> Result<AirportResponseDto> {
        let airport = sqlx::query_as::<_, Airport>(&format!(
            r#"
            UPDATE airport_ids
            SET code = COALESCE($2, code),
                name = COALESCE($3, name),
                city = COALESCE($4, city),
                country = COALESCE($5, country),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            AIRPORT_COLUMNS
        ))
        .bind(id)
        .bind(&dto.code)
        .bind(&dto.name)
        .bind(&dto.city)
        .bind(&dto.country)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_CODE))?
        .ok_or_else(|| AppError::NotFound(format!("Airport {} not found", id)))?;

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_UPDATE).entity(ENTITY_AIRPORT, id))
            .await;

        Ok(airport.into())
    }

    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<()> {
        let result = sqlx::query("DELETE FROM airport_ids WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Airport {} not found", id)));
        }

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_DELETE).entity(ENTITY_AIRPORT, id))
            .await;

        Ok(())
    }
}
