use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{date, db};

/// Who a token was issued to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Primary,
    Regular,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Primary | Self::Regular)
    }
}

impl From<db::admin::Role> for Role {
    fn from(role: db::admin::Role) -> Self {
        match role {
            db::admin::Role::Primary => Self::Primary,
            db::admin::Role::Regular => Self::Regular,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    #[serde(rename = "Customer_id")]
    pub customer_id: i32,
    #[serde(rename = "FName")]
    pub first_name: String,
    #[serde(rename = "LName")]
    pub last_name: String,
    pub gender: String,
    pub email: String,
    #[serde(rename = "Date_of_birth")]
    pub date_of_birth: String,
    #[serde(rename = "Membership_id")]
    pub membership_id: i32,
    #[serde(rename = "Loyal_point")]
    pub loyal_point: i32,
    pub phone: Option<String>,
    /// Present only in login responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<db::customer::Customer> for Customer {
    fn from(c: db::customer::Customer) -> Self {
        Self {
            customer_id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            gender: c.gender,
            email: c.email,
            date_of_birth: date::format_dmy(c.date_of_birth),
            membership_id: c.membership_id,
            loyal_point: c.loyal_point,
            phone: c.phone,
            token: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Admin {
    #[serde(rename = "Admin_id")]
    pub admin_id: i32,
    pub name: String,
    pub gender: String,
    #[serde(rename = "Date_of_birth")]
    pub date_of_birth: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(rename = "Branch_id")]
    pub branch_id: Option<i32>,
    #[serde(rename = "Branch_Name")]
    pub branch_name: Option<String>,
    #[serde(default, rename = "Admin_Manager_id")]
    pub manager_id: Option<i32>,
    pub role: db::admin::Role,
    /// Present only in login responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<db::admin::Admin> for Admin {
    fn from(a: db::admin::Admin) -> Self {
        Self {
            admin_id: a.id,
            name: a.name,
            gender: a.gender,
            date_of_birth: date::format_ymd(a.date_of_birth),
            email: a.email,
            phone: a.phone,
            branch_id: a.branch_id,
            branch_name: a.branch_name,
            manager_id: a.manager_id,
            role: a.role,
            token: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CustomerRegistration {
    pub fname: String,
    pub lname: String,
    pub gender: String,
    pub email: String,
    /// `DD/MM/YYYY`.
    pub dob: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CustomerUpdate {
    pub id: i32,
    pub fname: String,
    pub lname: String,
    pub gender: String,
    pub email: String,
    /// `DD/MM/YYYY`.
    pub dob: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AdminRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    /// `YYYY-MM-DD`.
    pub dob: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub branch_id: Option<i32>,
    pub role: db::admin::Role,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AdminUpdate {
    pub id: i32,
    pub name: String,
    pub gender: String,
    /// `YYYY-MM-DD`.
    pub dob: String,
    pub email: String,
    #[serde(default)]
    pub branch_id: Option<i32>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PasswordChange {
    /// Customer or admin identifier, depending on the endpoint.
    pub id: i32,
    pub old_password: String,
    pub new_password: String,
}

const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Field constraints the store doesn't check itself.
#[derive(Clone, Debug, Display, PartialEq)]
pub enum Invalid {
    #[display("Gender must be Male, Female or Other")]
    Gender,

    #[display("Name must be at most 50 characters")]
    NameTooLong,

    #[display("Password must be at least 8 characters")]
    PasswordTooShort,

    #[display("Phone must be a 10-digit number")]
    Phone,

    #[display("{_0}")]
    Date(date::InvalidDate),
}

fn check_gender(gender: &str) -> Result<(), Invalid> {
    GENDERS
        .contains(&gender)
        .then_some(())
        .ok_or(Invalid::Gender)
}

fn check_name(name: &str) -> Result<(), Invalid> {
    (name.chars().count() <= 50)
        .then_some(())
        .ok_or(Invalid::NameTooLong)
}

impl CustomerRegistration {
    pub fn into_db(self) -> Result<db::customer::NewCustomer, Invalid> {
        check_name(&self.fname)?;
        check_name(&self.lname)?;
        check_gender(&self.gender)?;
        if self.password.chars().count() < 8 {
            return Err(Invalid::PasswordTooShort);
        }
        Ok(db::customer::NewCustomer {
            date_of_birth: date::parse_dmy(&self.dob).map_err(Invalid::Date)?,
            first_name: self.fname,
            last_name: self.lname,
            gender: self.gender,
            email: self.email,
            phone: self.phone,
            password: self.password,
        })
    }
}

impl CustomerUpdate {
    pub fn into_db(self) -> Result<db::customer::ProfileUpdate, Invalid> {
        check_name(&self.fname)?;
        check_name(&self.lname)?;
        check_gender(&self.gender)?;
        Ok(db::customer::ProfileUpdate {
            date_of_birth: date::parse_dmy(&self.dob).map_err(Invalid::Date)?,
            id: self.id,
            first_name: self.fname,
            last_name: self.lname,
            gender: self.gender,
            email: self.email,
            phone: self.phone,
        })
    }
}

impl AdminRegistration {
    pub fn into_db(self) -> Result<db::admin::NewAdmin, Invalid> {
        check_gender(&self.gender)?;
        Ok(db::admin::NewAdmin {
            date_of_birth: date::parse_ymd(&self.dob).map_err(Invalid::Date)?,
            name: self.name,
            email: self.email,
            password: self.password,
            gender: self.gender,
            phone: self.phone,
            branch_id: self.branch_id,
            role: self.role,
        })
    }
}

impl AdminUpdate {
    pub fn into_db(self) -> Result<db::admin::AdminProfile, Invalid> {
        if let Some(phone) = &self.phone {
            if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(Invalid::Phone);
            }
        }
        Ok(db::admin::AdminProfile {
            date_of_birth: date::parse_ymd(&self.dob).map_err(Invalid::Date)?,
            id: self.id,
            name: self.name,
            gender: self.gender,
            email: self.email,
            branch_id: self.branch_id,
            phone: self.phone,
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn registration() -> CustomerRegistration {
        CustomerRegistration {
            fname: "Lan".into(),
            lname: "Nguyen".into(),
            gender: "Female".into(),
            email: "lan@example.com".into(),
            dob: "02/09/2000".into(),
            phone: None,
            password: "password1".into(),
        }
    }

    #[test]
    fn customer_dob_is_day_month_year() {
        let customer = registration().into_db().unwrap();
        assert_eq!(customer.date_of_birth, date!(2000 - 09 - 02));

        let err = CustomerRegistration {
            dob: "2000-09-02".into(),
            ..registration()
        }
        .into_db()
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid date format. Use dd/mm/yyyy");
    }

    #[test]
    fn rejects_unknown_gender_and_short_password() {
        let err = CustomerRegistration {
            gender: "Robot".into(),
            ..registration()
        }
        .into_db()
        .unwrap_err();
        assert_eq!(err, Invalid::Gender);

        let err = CustomerRegistration {
            password: "short".into(),
            ..registration()
        }
        .into_db()
        .unwrap_err();
        assert_eq!(err, Invalid::PasswordTooShort);
    }

    #[test]
    fn admin_dob_is_year_month_day() {
        let update = AdminUpdate {
            id: 1,
            name: "Minh".into(),
            gender: "Male".into(),
            dob: "1990-01-31".into(),
            email: "minh@example.com".into(),
            branch_id: Some(1),
            phone: Some("0901234567".into()),
        };
        let profile = update.clone().into_db().unwrap();
        assert_eq!(profile.date_of_birth, date!(1990 - 01 - 31));

        let err = AdminUpdate {
            phone: Some("12345".into()),
            ..update
        }
        .into_db()
        .unwrap_err();
        assert_eq!(err, Invalid::Phone);
    }

    #[test]
    fn only_admin_roles_are_admins() {
        assert!(Role::Primary.is_admin());
        assert!(Role::Regular.is_admin());
        assert!(!Role::Customer.is_admin());
    }
}
