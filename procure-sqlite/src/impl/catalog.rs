use crate::{
    Db,
    types::{BuildItemRow, ComponentRow, OfferRow, SupplierRow},
};
use procure_core::{
    models::{
        BuildId, CatalogSnapshot, Component, ComponentId, LineItem, OfferRecord, ShoppingList,
        Supplier,
    },
    ports::{CatalogFailure, CatalogRepository},
};
use time::OffsetDateTime;
use tracing::{Level, event};

impl CatalogRepository for Db {
    type Error = sqlx::Error;

    async fn load_offers(
        &self,
        component_ids: &[ComponentId],
        as_of: OffsetDateTime,
    ) -> Result<Result<CatalogSnapshot, CatalogFailure>, Self::Error> {
        // sqlite has no array binds; we pass the id list as JSON and expand it with json_each
        let ids = serde_json::to_string(component_ids)
            .map_err(|error| sqlx::Error::Encode(Box::new(error)))?;

        let components = sqlx::query_as::<_, ComponentRow>(
            r#"
            select
                id, name, category, brand, specification
            from
                component
            where
                id in (select value from json_each($1))
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.reader)
        .await?
        .into_iter()
        .map(Component::from)
        .collect::<Vec<_>>();

        // Inactive rows are superseded history and never leave the store
        let offers = sqlx::query_as::<_, OfferRow>(
            r#"
            select
                supplier_id, component_id, price, available, active, updated_at
            from
                offer
            where
                component_id in (select value from json_each($1))
            and
                active = 1
            order by
                id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.reader)
        .await?
        .into_iter()
        .map(OfferRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        let suppliers = sqlx::query_as::<_, SupplierRow>(
            r#"
            select
                id, name, currency, min_order, min_shipping
            from
                supplier
            where
                id in (
                    select
                        supplier_id
                    from
                        offer
                    where
                        component_id in (select value from json_each($1))
                    and
                        active = 1
                )
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.reader)
        .await?
        .into_iter()
        .map(Supplier::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        event!(
            Level::DEBUG,
            requested = component_ids.len(),
            components = components.len(),
            suppliers = suppliers.len(),
            offers = offers.len(),
            "catalog rows loaded"
        );

        Ok(CatalogSnapshot::assemble(
            component_ids,
            components,
            suppliers,
            offers,
            as_of,
            &self.catalog,
        ))
    }

    async fn load_shopping_list(
        &self,
        build_id: &BuildId,
    ) -> Result<Result<ShoppingList, CatalogFailure>, Self::Error> {
        let exists = sqlx::query_scalar::<_, i64>("select 1 from build where id = $1")
            .bind(build_id.as_str())
            .fetch_optional(&self.reader)
            .await?
            .is_some();

        if !exists {
            return Ok(Err(CatalogFailure::BuildNotFound(build_id.clone())));
        }

        let items = sqlx::query_as::<_, BuildItemRow>(
            r#"
            select
                component_id, quantity
            from
                build_item
            where
                build_id = $1
            order by
                position
            "#,
        )
        .bind(build_id.as_str())
        .fetch_all(&self.reader)
        .await?
        .into_iter()
        .map(LineItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        event!(Level::DEBUG, %build_id, lines = items.len(), "shopping list loaded");

        Ok(Ok(ShoppingList {
            build_id: build_id.clone(),
            items,
        }))
    }
}
