use async_trait::async_trait;
use sqlx::PgPool;

use farebox_core::error::BoxError;
use farebox_core::store::RouteStore;

pub struct PostgresRouteStore {
    pub pool: PgPool,
}

#[async_trait]
impl RouteStore for PostgresRouteStore {
    async fn find_id_by_cities(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<i32>, BoxError> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM routes WHERE origin_city = $1 AND destination_city = $2",
        )
        .bind(origin)
        .bind(destination)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn create_route(&self, origin: &str, destination: &str) -> Result<(), BoxError> {
        // A concurrent creator may win the race; the caller's re-query
        // converges on the surviving row.
        sqlx::query(
            r#"
            INSERT INTO routes (origin_city, destination_city)
            VALUES ($1, $2)
            ON CONFLICT (origin_city, destination_city) DO NOTHING
            "#,
        )
        .bind(origin)
        .bind(destination)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
