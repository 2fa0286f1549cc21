use serde::{Deserialize, Serialize};

/// Страница результатов списка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Количество записей, прошедших фильтр (до нарезки на страницы)
    pub total: usize,
    /// Номер страницы, начиная с 1
    pub page: usize,
    pub limit: usize,
    /// Не меньше 1, даже если записей нет
    pub total_pages: usize,
}

/// Параметры запроса списка участников
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberListRequest {
    /// Подстрока имени, фамилии или телефона
    pub search: Option<String>,
    /// ACTIVE | INACTIVE | NO_MEMBERSHIP
    pub status: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}
