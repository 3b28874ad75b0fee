//! `PostgreSQL` store repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopforge_core::{DnsIp, Store, StoreId};

use super::{DnsConfigUpdate, NewStore, RepositoryError, StoreRepository};

const STORE_COLUMNS: &str = r"
    id, name, domain, vercel_dns_ip, vercel_cname, vercel_domain_config,
    last_dns_config_fetch, created_at, updated_at
";

/// Repository for tenant stores backed by `storefront.store`.
#[derive(Clone)]
pub struct PgStoreRepository {
    pool: PgPool,
}

impl PgStoreRepository {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn find_by_domain(&self, domain: &str) -> Result<Vec<Store>, RepositoryError> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM storefront.store WHERE domain = $1 ORDER BY id"
        ))
        .bind(domain)
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    async fn get_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM storefront.store WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    async fn update_dns_ip(
        &self,
        id: StoreId,
        ip: &DnsIp,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.store
            SET vercel_dns_ip = $2, last_dns_config_fetch = $3, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(ip.as_str())
        .bind(fetched_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn update_dns_config(
        &self,
        id: StoreId,
        update: &DnsConfigUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.store
            SET vercel_dns_ip = $2,
                vercel_cname = $3,
                vercel_domain_config = $4,
                last_dns_config_fetch = $5,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&update.dns_ip)
        .bind(&update.cname)
        .bind(&update.domain_config)
        .bind(update.fetched_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn create(&self, store: &NewStore) -> Result<Store, RepositoryError> {
        sqlx::query_as::<_, Store>(&format!(
            "INSERT INTO storefront.store (name, domain) VALUES ($1, $2) RETURNING {STORE_COLUMNS}"
        ))
        .bind(&store.name)
        .bind(store.domain.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
