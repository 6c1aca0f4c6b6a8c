use sea_orm::entity::prelude::*;
use sea_orm::ActiveEnum;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// ISO-style weekday, 1 = Monday through 7 = Sunday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Weekday {
    #[sea_orm(num_value = 1)]
    Monday = 1,
    #[sea_orm(num_value = 2)]
    Tuesday = 2,
    #[sea_orm(num_value = 3)]
    Wednesday = 3,
    #[sea_orm(num_value = 4)]
    Thursday = 4,
    #[sea_orm(num_value = 5)]
    Friday = 5,
    #[sea_orm(num_value = 6)]
    Saturday = 6,
    #[sea_orm(num_value = 7)]
    Sunday = 7,
}

// The wire form is the number itself, matching the integer column.
impl Serialize for Weekday {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(*self as i32)
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let day = i32::deserialize(deserializer)?;
        Weekday::try_from_value(&day)
            .map_err(|_| de::Error::custom(format!("day must be between 1 and 7, got {day}")))
    }
}

/// One opening slot. Times are absent when `closed` is set for the whole day.
/// Presented ordered by (day, opening_time).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "opening_hours")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(skip_serializing)]
    pub business_id: i32,
    pub day: Weekday,
    pub opening_time: Option<Time>,
    pub closing_time: Option<Time>,
    pub closed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::business::Entity",
        from = "Column::BusinessId",
        to = "super::business::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Business,
}

impl Related<super::business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Business.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_serializes_as_its_number() {
        assert_eq!(
            serde_json::to_value(Weekday::Monday).unwrap(),
            serde_json::json!(1)
        );
        assert_eq!(
            serde_json::to_value(Weekday::Sunday).unwrap(),
            serde_json::json!(7)
        );
    }

    #[test]
    fn weekday_deserializes_from_the_number_only() {
        let day: Weekday = serde_json::from_str("3").unwrap();
        assert_eq!(day, Weekday::Wednesday);

        assert!(serde_json::from_str::<Weekday>("0").is_err());
        assert!(serde_json::from_str::<Weekday>("8").is_err());
        assert!(serde_json::from_str::<Weekday>("\"Monday\"").is_err());
    }
}
