use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// An offer timestamp as stored in the catalog: a UTC wall-clock time
/// without an offset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct DateTime(PrimitiveDateTime);

impl From<OffsetDateTime> for DateTime {
    fn from(value: OffsetDateTime) -> Self {
        let utc = value.to_offset(UtcOffset::UTC);
        Self(PrimitiveDateTime::new(utc.date(), utc.time()))
    }
}

impl From<DateTime> for OffsetDateTime {
    fn from(value: DateTime) -> Self {
        value.0.assume_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn normalizes_to_utc() {
        let local = datetime!(2026-03-01 14:30 +02:00);
        let stored = DateTime::from(local);
        assert_eq!(stored, DateTime::from(datetime!(2026-03-01 12:30 UTC)));
        assert_eq!(OffsetDateTime::from(stored), local);
        assert_eq!(OffsetDateTime::from(stored).offset(), UtcOffset::UTC);
    }
}
