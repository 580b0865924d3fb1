use sqlx::{Postgres, Transaction};
use std::collections::HashSet;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::stock_inventory::models::OrphanSnapshot;

/// Detach the inspections of a stock record about to be deleted.
///
/// The foreign key is cleared, the deleted flag set and the part identity
/// copied from the snapshot so each inspection stays self-describing.
pub async fn orphan_inspections(
    tx: &mut Transaction<'_, Postgres>,
    snapshot: &OrphanSnapshot,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE incoming_inspections
        SET stock_inventory_id = NULL,
            stock_inventory_deleted = TRUE,
            part_no = $2,
            serial_no = $3,
            description = $4,
            updated_at = NOW()
        WHERE stock_inventory_id = $1
        "#,
    )
    .bind(snapshot.stock_inventory_id)
    .bind(&snapshot.part_no)
    .bind(&snapshot.serial_no)
    .bind(&snapshot.description)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

/// Copy the current part identity onto every inspection still linked to the record
pub async fn refresh_inspections(
    tx: &mut Transaction<'_, Postgres>,
    snapshot: &OrphanSnapshot,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE incoming_inspections
        SET part_no = $2,
            serial_no = $3,
            description = $4,
            updated_at = NOW()
        WHERE stock_inventory_id = $1
        "#,
    )
    .bind(snapshot.stock_inventory_id)
    .bind(&snapshot.part_no)
    .bind(&snapshot.serial_no)
    .bind(&snapshot.description)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

/// Split requested ids into (found, not found), in request order, without duplicates
pub fn partition_found(requested: &[Uuid], existing: &HashSet<Uuid>) -> (Vec<Uuid>, Vec<Uuid>) {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for id in requested {
        if !seen.insert(*id) {
            continue;
        }
        if existing.contains(id) {
            found.push(*id);
        } else {
            missing.push(*id);
        }
    }

    (found, missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_keeps_order_and_drops_duplicates() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);
        let existing: HashSet<Uuid> = [a, c].into_iter().collect();

        let (found, missing) = partition_found(&[c, b, a, c, b], &existing);

        assert_eq!(found, vec![c, a]);
        assert_eq!(missing, vec![b]);
    }

    #[test]
    fn test_partition_with_nothing_found() {
        let ids = [Uuid::from_u128(9)];
        let (found, missing) = partition_found(&ids, &HashSet::new());
        assert!(found.is_empty());
        assert_eq!(missing, ids.to_vec());
    }
}
