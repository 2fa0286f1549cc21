use contracts::domain::a001_member::views::MemberListItem;
use contracts::enums::member_status::MemberStatus;
use contracts::shared::pagination::Page;

/// Запись с уже вычисленным статусом
pub trait HasStatus {
    fn status(&self) -> MemberStatus;
}

impl HasStatus for MemberListItem {
    fn status(&self) -> MemberStatus {
        self.status
    }
}

/// Фильтр по статусу и нарезка на страницы
///
/// Сначала фильтр, потом страницы: `total` и `total_pages` считаются по
/// отфильтрованному набору. `page` начинается с 1 (0 трактуется как 1),
/// `limit` не меньше 1. Страница за пределами набора пуста.
pub fn filter_and_paginate<T: HasStatus>(
    items: Vec<T>,
    status_filter: Option<MemberStatus>,
    page: usize,
    limit: usize,
) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);

    let matching: Vec<T> = match status_filter {
        Some(status) => items.into_iter().filter(|i| i.status() == status).collect(),
        None => items,
    };

    let total = matching.len();
    let total_pages = total.div_ceil(limit).max(1);
    let offset = (page - 1).saturating_mul(limit);

    let items = matching.into_iter().skip(offset).take(limit).collect();

    Page {
        items,
        total,
        page,
        limit,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(usize, MemberStatus);

    impl HasStatus for Row {
        fn status(&self) -> MemberStatus {
            self.1
        }
    }

    fn rows(n: usize, status: MemberStatus) -> Vec<Row> {
        (0..n).map(|i| Row(i, status)).collect()
    }

    #[test]
    fn third_page_of_twenty_five() {
        let result = filter_and_paginate(rows(25, MemberStatus::Active), None, 3, 10);
        assert_eq!(result.items.len(), 5);
        assert_eq!(result.total, 25);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.items[0].0, 20);
    }

    #[test]
    fn filter_applies_before_pagination() {
        let mut all = rows(12, MemberStatus::Inactive);
        all.extend(rows(3, MemberStatus::Active));
        all.extend(rows(4, MemberStatus::NoMembership));

        let result = filter_and_paginate(all, Some(MemberStatus::Active), 1, 10);
        assert_eq!(result.total, 3);
        assert_eq!(result.total_pages, 1);
        assert!(result.items.iter().all(|r| r.1 == MemberStatus::Active));
    }

    #[test]
    fn empty_set_has_one_page() {
        let result = filter_and_paginate(Vec::<Row>::new(), None, 1, 10);
        assert_eq!(result.total, 0);
        assert_eq!(result.total_pages, 1);
        assert!(result.items.is_empty());
    }

    #[test]
    fn page_past_end_is_empty() {
        let result = filter_and_paginate(rows(5, MemberStatus::Active), None, 4, 2);
        assert!(result.items.is_empty());
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.page, 4);
    }

    #[test]
    fn zero_page_and_limit_are_clamped() {
        let result = filter_and_paginate(rows(3, MemberStatus::Active), None, 0, 0);
        assert_eq!(result.page, 1);
        assert_eq!(result.limit, 1);
        assert_eq!(result.items, vec![Row(0, MemberStatus::Active)]);
        assert_eq!(result.total_pages, 3);
    }
}
