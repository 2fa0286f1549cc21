use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;
use uuid::Uuid;

/// Трейт для типов идентификаторов агрегатов
pub trait AggregateId:
    Clone + Copy + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    /// Обернуть готовый UUID
    fn from_uuid(value: Uuid) -> Self;

    /// Внутреннее значение
    fn value(&self) -> Uuid;

    /// Сгенерировать новый случайный ID
    fn new_v4() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Преобразовать ID в строку
    fn as_string(&self) -> String {
        self.value().to_string()
    }

    /// Создать ID из строки
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s.trim())
            .map(Self::from_uuid)
            .map_err(|e| format!("Invalid UUID '{}': {}", s, e))
    }
}

/// Объявляет newtype-идентификатор агрегата поверх UUID
#[macro_export]
macro_rules! aggregate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $crate::domain::common::AggregateId for $name {
            fn from_uuid(value: uuid::Uuid) -> Self {
                Self(value)
            }

            fn value(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::aggregate_id!(SampleId);

    #[test]
    fn parses_and_prints_uuid() {
        let id = SampleId::new_v4();
        let parsed = SampleId::from_string(&id.as_string()).unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.to_string(), id.0.to_string());
    }

    #[test]
    fn rejects_garbage() {
        let err = SampleId::from_string("not-a-uuid").unwrap_err();
        assert!(err.contains("not-a-uuid"));
    }
}
