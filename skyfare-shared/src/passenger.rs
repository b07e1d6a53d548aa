use crate::pii::Masked;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Passenger snapshot attached to a ticket at booking time.
///
/// A passenger is not an account: a customer books tickets for companions
/// who never registered, so the record has no identity of its own beyond
/// the ticket it rides on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passenger {
    pub full_name: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub address: Masked<String>,
}

impl Passenger {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        date_of_birth: NaiveDate,
        gender: Gender,
        address: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: Masked(email.into()),
            phone: Masked(phone.into()),
            date_of_birth,
            gender,
            address: Masked(address.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_details_masked_in_debug() {
        let p = Passenger::new(
            "Linh Tran",
            "linh@example.com",
            "+84 900 000 000",
            NaiveDate::from_ymd_opt(1994, 3, 12).unwrap(),
            Gender::Female,
            "12 Hang Bai, Hanoi",
        );
        let dump = format!("{:?}", p);
        assert!(dump.contains("Linh Tran"));
        assert!(!dump.contains("example.com"));
        assert!(!dump.contains("Hang Bai"));
    }
}
