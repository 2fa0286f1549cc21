use chrono::Utc;
use contracts::domain::a002_membership_type::aggregate::MembershipTypeDto;
use sea_orm::DatabaseConnection;

use crate::domain::a002_membership_type::{repository, service};

/// Каталог по умолчанию: (название, дней, цена, описание)
const DEFAULT_MEMBERSHIP_TYPES: &[(&str, i32, f64, &str)] = &[
    ("DIARIA", 1, 15.0, "Acceso por un día"),
    ("SEMANAL", 7, 85.0, "Acceso por una semana"),
    ("QUINCENAL", 15, 150.0, "Acceso por quince días"),
    ("MENSUAL", 30, 280.0, "Acceso por un mes"),
    ("TRIMESTRAL", 90, 750.0, "Acceso por tres meses"),
];

/// Заполнение каталога типов абонементов, если он пуст
pub async fn ensure_default_membership_types(db: &DatabaseConnection) -> anyhow::Result<()> {
    let count = repository::count(db).await?;
    if count > 0 {
        return Ok(());
    }

    tracing::info!("Membership type catalog is empty. Creating defaults...");
    let now = Utc::now();
    for (name, days_granted, price, description) in DEFAULT_MEMBERSHIP_TYPES {
        let dto = MembershipTypeDto {
            name: name.to_string(),
            days_granted: *days_granted,
            price: Some(*price),
            description: Some(description.to_string()),
        };
        service::create(db, dto, now)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed membership type {}: {}", name, e))?;
    }
    tracing::info!(
        "Created {} default membership types",
        DEFAULT_MEMBERSHIP_TYPES.len()
    );

    Ok(())
}
