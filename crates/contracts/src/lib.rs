//! Общие контракты (DTO, агрегаты, перечисления) между backend и клиентами

pub mod dashboards;
pub mod domain;
pub mod enums;
pub mod shared;
