pub mod address;
pub mod business;
pub mod business_payment_type;
pub mod business_tag;
pub mod category;
pub mod opening_hour;
pub mod payment_type;
pub mod phone;
pub mod social_link;
pub mod suggestion;
pub mod tag;
pub mod user;

pub mod prelude {
    pub use super::address::Entity as Address;
    pub use super::business::Entity as Business;
    pub use super::business_payment_type::Entity as BusinessPaymentType;
    pub use super::business_tag::Entity as BusinessTag;
    pub use super::category::Entity as Category;
    pub use super::opening_hour::Entity as OpeningHour;
    pub use super::payment_type::Entity as PaymentType;
    pub use super::phone::Entity as Phone;
    pub use super::social_link::Entity as SocialLink;
    pub use super::suggestion::Entity as Suggestion;
    pub use super::tag::Entity as Tag;
    pub use super::user::Entity as User;
}
