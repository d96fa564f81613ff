use derive_more::Display;
use enum_utils::FromStr;
use time::{Date, Time};
use tokio_postgres::{types::ToSql, Error, Row};

use super::Client;

#[derive(Clone, Debug)]
pub struct Branch {
    pub id: i32,
    pub city: String,
    pub address: String,
    pub name: String,
    pub admin_id: Option<i32>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug)]
pub struct BranchInput {
    pub name: String,
    pub city: String,
    pub address: String,
    pub admin_id: Option<i32>,
    pub phone: Option<String>,
}

/// One showtime of a branch along with the movie it screens.
#[derive(Clone, Debug)]
pub struct BranchShowing {
    pub movie_id: i32,
    pub title: String,
    pub image: Option<String>,
    pub release_date: Option<Date>,
    pub language: String,
    pub age_rating: String,
    pub duration: Option<i32>,
    pub description: Option<String>,
    pub showtime_id: i32,
    pub date: Date,
    pub start_time: Time,
    pub format: String,
    pub subtitle: String,
    pub hall_number: i32,
    pub hall_type: String,
}

/// Columns a branch search may be sorted by.
#[derive(Clone, Copy, Debug, Default, Display, FromStr, PartialEq)]
#[enumeration(case_insensitive)]
pub enum SortColumn {
    #[default]
    #[display("b.branch_id")]
    #[enumeration(rename = "branch_id")]
    BranchId,
    #[display("b.name")]
    #[enumeration(rename = "name")]
    Name,
    #[display("b.city")]
    #[enumeration(rename = "city")]
    City,
    #[display("b.address")]
    #[enumeration(rename = "address")]
    Address,
}

#[derive(Clone, Copy, Debug, Default, Display, FromStr, PartialEq)]
#[enumeration(case_insensitive)]
pub enum SortOrder {
    #[default]
    #[display("ASC")]
    Asc,
    #[display("DESC")]
    Desc,
}

pub struct Search {
    pub text: Option<String>,
    pub sort_by: SortColumn,
    pub order: SortOrder,
    pub offset: i64,
    pub limit: i64,
}

impl Search {
    fn page_sql(&self) -> String {
        format!(
            "SELECT b.branch_id, b.city, b.address, b.name, b.admin_id, \
                    MAX(bp.bphone) AS phone \
             FROM cinema_branch b \
             LEFT JOIN branch_phone bp ON b.branch_id = bp.branch_id \
             WHERE $1::TEXT IS NULL \
                OR b.name ILIKE '%' || $1 || '%' \
                OR b.city ILIKE '%' || $1 || '%' \
                OR b.address ILIKE '%' || $1 || '%' \
             GROUP BY b.branch_id, b.city, b.address, b.name, b.admin_id \
             ORDER BY {} {} \
             OFFSET $2 LIMIT $3",
            self.sort_by, self.order,
        )
    }
}

fn branch_from_row(row: &Row) -> Branch {
    Branch {
        id: row.get("branch_id"),
        city: row.get("city"),
        address: row.get("address"),
        name: row.get("name"),
        admin_id: row.get("admin_id"),
        phone: row.get("phone"),
    }
}

impl Client {
    /// Returns one page of matching branches and the total number of
    /// matches.
    pub async fn search_branches(
        &self,
        search: &Search,
    ) -> Result<(Vec<Branch>, i64), Error> {
        const COUNT_SQL: &str = "\
            SELECT COUNT(*) FROM cinema_branch b \
            WHERE $1::TEXT IS NULL \
               OR b.name ILIKE '%' || $1 || '%' \
               OR b.city ILIKE '%' || $1 || '%' \
               OR b.address ILIKE '%' || $1 || '%'";

        let page_params: [&(dyn ToSql + Sync); 3] =
            [&search.text, &search.offset, &search.limit];
        let count_params: [&(dyn ToSql + Sync); 1] = [&search.text];

        let page_sql = search.page_sql();
        let client = self.shared().await;
        let (page, count) = tokio::try_join!(
            client.query(&page_sql, &page_params),
            client.query_one(COUNT_SQL, &count_params),
        )?;

        Ok((page.iter().map(branch_from_row).collect(), count.get(0)))
    }

    pub async fn get_branch_by_id(
        &self,
        id: i32,
    ) -> Result<Option<Branch>, Error> {
        const SQL: &str = "\
            SELECT b.branch_id, b.city, b.address, b.name, b.admin_id, \
                   MAX(bp.bphone) AS phone \
            FROM cinema_branch b \
            LEFT JOIN branch_phone bp ON b.branch_id = bp.branch_id \
            WHERE b.branch_id = $1 \
            GROUP BY b.branch_id, b.city, b.address, b.name, b.admin_id";
        Ok(self
            .shared()
            .await
            .query_opt(SQL, &[&id])
            .await?
            .as_ref()
            .map(branch_from_row))
    }

    /// Showtimes of the branch ordered by movie, then by start.
    pub async fn get_branch_showings(
        &self,
        branch_id: i32,
    ) -> Result<Vec<BranchShowing>, Error> {
        const SQL: &str = "\
            SELECT m.movie_id, m.title, m.image, m.release_date, \
                   m.language, m.age_rating, m.duration, m.description, \
                   s.showtime_id, s.date, s.start_time, s.format, \
                   s.subtitle, h.hall_number, h.type AS hall_type \
            FROM showtime s \
            JOIN movie m ON m.movie_id = s.movie_id \
            JOIN hall h ON h.branch_id = s.branch_id \
                       AND h.hall_number = s.hall_number \
            WHERE s.branch_id = $1 \
            ORDER BY m.movie_id, s.date, s.start_time";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&branch_id])
            .await?
            .into_iter()
            .map(|row| BranchShowing {
                movie_id: row.get("movie_id"),
                title: row.get("title"),
                image: row.get("image"),
                release_date: row.get("release_date"),
                language: row.get("language"),
                age_rating: row.get("age_rating"),
                duration: row.get("duration"),
                description: row.get("description"),
                showtime_id: row.get("showtime_id"),
                date: row.get("date"),
                start_time: row.get("start_time"),
                format: row.get("format"),
                subtitle: row.get("subtitle"),
                hall_number: row.get("hall_number"),
                hall_type: row.get("hall_type"),
            })
            .collect())
    }

    pub async fn create_branch(
        &self,
        branch: &BranchInput,
    ) -> Result<Option<Branch>, Error> {
        const SQL: &str = "SELECT * FROM create_branch($1, $2, $3, $4, $5)";
        Ok(self
            .shared()
            .await
            .query_opt(
                SQL,
                &[
                    &branch.name,
                    &branch.city,
                    &branch.address,
                    &branch.admin_id,
                    &branch.phone,
                ],
            )
            .await?
            .as_ref()
            .map(branch_from_row))
    }

    pub async fn update_branch(
        &self,
        id: i32,
        branch: &BranchInput,
    ) -> Result<Option<Branch>, Error> {
        const SQL: &str =
            "SELECT * FROM update_branch($1, $2, $3, $4, $5, $6)";
        Ok(self
            .shared()
            .await
            .query_opt(
                SQL,
                &[
                    &id,
                    &branch.name,
                    &branch.city,
                    &branch.address,
                    &branch.admin_id,
                    &branch.phone,
                ],
            )
            .await?
            .as_ref()
            .map(branch_from_row))
    }

    pub async fn delete_branch(&self, id: i32) -> Result<(), Error> {
        const SQL: &str = "CALL delete_branch($1)";
        self.shared().await.execute(SQL, &[&id]).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_accepts_known_columns_only() {
        assert_eq!("Branch_id".parse(), Ok(SortColumn::BranchId));
        assert_eq!("name".parse(), Ok(SortColumn::Name));
        assert_eq!("CITY".parse(), Ok(SortColumn::City));
        assert!("name; DROP TABLE branch".parse::<SortColumn>().is_err());
        assert_eq!(SortColumn::City.to_string(), "b.city");
    }

    #[test]
    fn sort_order_is_case_insensitive() {
        assert_eq!("asc".parse(), Ok(SortOrder::Asc));
        assert_eq!("DESC".parse(), Ok(SortOrder::Desc));
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Desc.to_string(), "DESC");
    }

    #[test]
    fn page_query_orders_by_chosen_column() {
        let search = Search {
            text: Some("Hanoi".into()),
            sort_by: SortColumn::City,
            order: SortOrder::Desc,
            offset: 10,
            limit: 5,
        };

        let sql = search.page_sql();

        assert!(sql.contains("ORDER BY b.city DESC OFFSET $2 LIMIT $3"));
        assert!(!sql.contains("Hanoi"));
    }
}
