use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор участника (клиента зала)
    MemberId
);

/// Допустимый диапазон возраста участника
pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 120;

/// Длина номера телефона (локальный формат, только цифры)
pub const PHONE_DIGITS: usize = 8;

// ============================================================================
// Aggregate Root
// ============================================================================

/// Участник (клиент зала)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    /// Уникален среди всех участников
    pub phone: String,
    /// Устанавливается один раз при создании
    pub first_enrollment_date: DateTime<Utc>,
    /// Обновляется при каждом получении абонемента
    pub last_renewal_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Member {
    /// Создать нового участника для вставки в БД
    pub fn new_for_insert(dto: &MemberDto, now: DateTime<Utc>) -> Self {
        Self {
            id: MemberId::new_v4(),
            first_name: dto.first_name.trim().to_string(),
            last_name: dto.last_name.trim().to_string(),
            age: dto.age,
            phone: dto.phone.trim().to_string(),
            first_enrollment_date: now,
            last_renewal_date: None,
            metadata: EntityMetadata::created_at(now),
        }
    }

    /// Полное имя для отображения
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Применить частичное обновление
    pub fn update(&mut self, dto: &MemberUpdateDto, now: DateTime<Utc>) {
        if let Some(first_name) = &dto.first_name {
            self.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = &dto.last_name {
            self.last_name = last_name.trim().to_string();
        }
        if let Some(age) = dto.age {
            self.age = age;
        }
        if let Some(phone) = &dto.phone {
            self.phone = phone.trim().to_string();
        }
        self.metadata.touch(now);
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.first_name, "Имя")?;
        validate_name(&self.last_name, "Фамилия")?;
        validate_age(self.age)?;
        validate_phone(&self.phone)
    }
}

fn validate_name(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} не может быть пустым", field));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), String> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(format!(
            "Возраст должен быть в диапазоне {}..{}",
            MIN_AGE, MAX_AGE
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), String> {
    let phone = phone.trim();
    if phone.len() != PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!(
            "Телефон должен содержать ровно {} цифр",
            PHONE_DIGITS
        ));
    }
    Ok(())
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания участника (с необязательным первым абонементом)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub phone: String,
    #[serde(default)]
    pub membership_type_id: Option<String>,
}

/// DTO для частичного обновления участника
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdateDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
}

impl MemberUpdateDto {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.age.is_none()
            && self.phone.is_none()
    }
}

/// DTO для продления (нового абонемента)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewMembershipDto {
    pub membership_type_id: String,
}
