use std::error::Error as StdError;

use derive_more::Display;
use enum_utils::FromStr;
use serde::{Deserialize, Serialize};
use time::Date;
use tokio_postgres::{
    types::{
        accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql,
        Type,
    },
    Error, Row,
};

use super::Client;

#[derive(Clone, Debug)]
pub struct Admin {
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub date_of_birth: Date,
    pub email: String,
    pub phone: Option<String>,
    pub branch_id: Option<i32>,
    pub branch_name: Option<String>,
    pub manager_id: Option<i32>,
    pub role: Role,
}

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize,
)]
#[enumeration(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display("primary")]
    Primary,
    #[display("regular")]
    Regular,
}

impl FromSql<'_> for Role {
    accepts!(TEXT, VARCHAR, BPCHAR);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let repr = <&str>::from_sql(ty, raw)?;
        let role = repr.trim().parse().map_err(|_| "invalid admin role")?;
        Ok(role)
    }
}

impl ToSql for Role {
    accepts!(TEXT, VARCHAR, BPCHAR);

    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.to_string().as_str().to_sql(ty, out)
    }
}

#[derive(Clone, Debug)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    pub date_of_birth: Date,
    pub phone: Option<String>,
    pub branch_id: Option<i32>,
    pub role: Role,
}

#[derive(Clone, Debug)]
pub struct AdminProfile {
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub date_of_birth: Date,
    pub email: String,
    pub branch_id: Option<i32>,
    pub phone: Option<String>,
}

const ADMIN_COLUMNS: &str = "\
    admin_id, name, gender, date_of_birth, email, phone, branch_id, \
    branch_name, admin_manager_id, role";

fn admin_from_row(row: &Row) -> Admin {
    Admin {
        id: row.get("admin_id"),
        name: row.get("name"),
        gender: row.get("gender"),
        date_of_birth: row.get("date_of_birth"),
        email: row.get("email"),
        phone: row.get("phone"),
        branch_id: row.get("branch_id"),
        branch_name: row.get("branch_name"),
        manager_id: row.get("admin_manager_id"),
        role: row.get("role"),
    }
}

impl Client {
    /// Verifies the credentials; the store rejects a mismatch.
    pub async fn login_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Admin>, Error> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM login_admin($1, $2)");
        Ok(self
            .shared()
            .await
            .query_opt(&sql, &[&email, &password])
            .await?
            .as_ref()
            .map(admin_from_row))
    }

    pub async fn get_all_admins(&self) -> Result<Vec<Admin>, Error> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM get_all_admins()");
        Ok(self
            .shared()
            .await
            .query(&sql, &[])
            .await?
            .iter()
            .map(admin_from_row)
            .collect())
    }

    pub async fn create_admin(
        &self,
        admin: &NewAdmin,
    ) -> Result<Option<Admin>, Error> {
        let sql = format!(
            "SELECT {ADMIN_COLUMNS} \
             FROM create_admin($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        Ok(self
            .shared()
            .await
            .query_opt(
                &sql,
                &[
                    &admin.name,
                    &admin.email,
                    &admin.password,
                    &admin.gender,
                    &admin.date_of_birth,
                    &admin.phone,
                    &admin.branch_id,
                    &admin.role,
                ],
            )
            .await?
            .as_ref()
            .map(admin_from_row))
    }

    pub async fn change_admin_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL change_admin_password($1, $2, $3)";
        self.shared()
            .await
            .execute(SQL, &[&id, &old_password, &new_password])
            .await
            .map(drop)
    }

    pub async fn update_admin_profile(
        &self,
        profile: &AdminProfile,
    ) -> Result<(), Error> {
        const SQL: &str =
            "CALL update_admin_profile($1, $2, $3, $4, $5, $6, $7)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &profile.id,
                    &profile.name,
                    &profile.gender,
                    &profile.date_of_birth,
                    &profile.email,
                    &profile.branch_id,
                    &profile.phone,
                ],
            )
            .await
            .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!("primary".parse(), Ok(Role::Primary));
        assert_eq!("regular".parse(), Ok(Role::Regular));
        assert!("customer".parse::<Role>().is_err());
        assert_eq!(Role::Regular.to_string(), "regular");
    }
}
