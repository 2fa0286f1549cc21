use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, EntityMetadata};

crate::aggregate_id!(
    /// Уникальный идентификатор типа абонемента
    MembershipTypeId
);

/// Тип абонемента (позиция каталога)
///
/// `is_active` управляет только видимостью в каталоге и не влияет
/// на действительность уже выданных абонементов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipType {
    pub id: MembershipTypeId,
    pub name: String,
    pub days_granted: i32,
    pub price: f64,
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl MembershipType {
    /// Создать новый тип абонемента для вставки в БД
    pub fn new_for_insert(dto: &MembershipTypeDto, now: DateTime<Utc>) -> Self {
        Self {
            id: MembershipTypeId::new_v4(),
            name: normalize_name(&dto.name),
            days_granted: dto.days_granted,
            price: dto.price.unwrap_or(0.0),
            description: dto.description.clone(),
            is_active: true,
            metadata: EntityMetadata::created_at(now),
        }
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &MembershipTypeUpdateDto, now: DateTime<Utc>) {
        if let Some(name) = &dto.name {
            self.name = normalize_name(name);
        }
        if let Some(days) = dto.days_granted {
            self.days_granted = days;
        }
        if let Some(price) = dto.price {
            self.price = price;
        }
        if let Some(description) = &dto.description {
            self.description = description.clone();
        }
        if let Some(is_active) = dto.is_active {
            self.is_active = is_active;
        }
        self.metadata.touch(now);
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.name.chars().count() < 2 {
            return Err("Название должно содержать минимум 2 символа".into());
        }
        if self.days_granted < 1 {
            return Err("Срок действия должен быть не меньше 1 дня".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Цена не может быть отрицательной".into());
        }
        Ok(())
    }
}

/// Названия типов хранятся в верхнем регистре
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// DTO для создания типа абонемента
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MembershipTypeDto {
    pub name: String,
    pub days_granted: i32,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// DTO для обновления типа абонемента
///
/// `description: Some(None)` очищает описание.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MembershipTypeUpdateDto {
    pub name: Option<String>,
    pub days_granted: Option<i32>,
    pub price: Option<f64>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl MembershipTypeUpdateDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.days_granted.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.is_active.is_none()
    }
}

/// Отличает отсутствующее поле от явного `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Option<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

/// Параметры запроса каталога
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MembershipTypeListRequest {
    #[serde(default)]
    pub include_inactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_upper_cased_and_price_defaults_to_zero() {
        let dto = MembershipTypeDto {
            name: " mensual ".into(),
            days_granted: 30,
            price: None,
            description: None,
        };
        let t = MembershipType::new_for_insert(&dto, Utc::now());
        assert_eq!(t.name, "MENSUAL");
        assert_eq!(t.price, 0.0);
        assert!(t.is_active);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn validation_limits() {
        let mut t = MembershipType::new_for_insert(
            &MembershipTypeDto {
                name: "X".into(),
                days_granted: 1,
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(t.validate().is_err());
        t.name = "XL".into();
        assert!(t.validate().is_ok());
        t.days_granted = 0;
        assert!(t.validate().is_err());
        t.days_granted = 1;
        t.price = -1.0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn update_dto_distinguishes_null_description() {
        let cleared: MembershipTypeUpdateDto =
            serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let untouched: MembershipTypeUpdateDto =
            serde_json::from_str(r#"{"isActive":false}"#).unwrap();
        assert_eq!(untouched.description, None);
        assert_eq!(untouched.is_active, Some(false));
    }

    #[test]
    fn deactivation_keeps_other_fields() {
        let now = Utc::now();
        let mut t = MembershipType::new_for_insert(
            &MembershipTypeDto {
                name: "semanal".into(),
                days_granted: 7,
                price: Some(85.0),
                description: Some("Una semana".into()),
            },
            now,
        );
        t.update(
            &MembershipTypeUpdateDto {
                is_active: Some(false),
                ..Default::default()
            },
            now,
        );
        assert!(!t.is_active);
        assert_eq!(t.days_granted, 7);
        assert_eq!(t.description.as_deref(), Some("Una semana"));
    }
}
