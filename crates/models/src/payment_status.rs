use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Payment state of a reservation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing paid yet, or the booking is free
    Pendiente,
    /// Some but not all of the total has been paid
    Parcial,
    /// Fully paid
    Pagada,
    /// Cancelled; terminal and frees the time slot
    Cancelada,
}

impl PaymentStatus {
    /// Derives the status from the amounts involved.
    ///
    /// Never yields `Cancelada`, which is only ever set explicitly.
    pub fn from_amounts(total: Decimal, paid: Decimal) -> Self {
        if total <= Decimal::ZERO || paid <= Decimal::ZERO {
            Self::Pendiente
        } else if paid < total {
            Self::Parcial
        } else {
            Self::Pagada
        }
    }

    pub fn is_cancelled(self) -> bool {
        self == Self::Cancelada
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Ok(Self::Pendiente),
            "parcial" => Ok(Self::Parcial),
            "pagada" => Ok(Self::Pagada),
            "cancelada" => Ok(Self::Cancelada),
            _ => Err(format!("Unknown payment status: {s}")),
        }
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for PaymentStatus {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "PaymentStatus".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::String(sea_orm::sea_query::StringLen::N(20))
    }
}

#[cfg(feature = "database")]
impl From<PaymentStatus> for Value {
    fn from(status: PaymentStatus) -> Self {
        Value::String(Some(Box::new(status.as_ref().to_owned())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for PaymentStatus {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse()
            .map_err(|e: String| sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(e)))
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for PaymentStatus {
    fn null() -> Value {
        Value::String(None)
    }
}
