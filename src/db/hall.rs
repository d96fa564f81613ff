use tokio_postgres::Error;

use super::Client;

#[derive(Clone, Debug)]
pub struct Hall {
    pub number: i32,
    pub kind: String,
    pub seat_capacity: i32,
    pub row_count: i32,
    pub col_count: i32,
}

impl Client {
    pub async fn get_halls_by_branch(
        &self,
        branch_id: i32,
    ) -> Result<Vec<Hall>, Error> {
        const SQL: &str = "\
            SELECT hall_number, type, seat_capacity, row_count, col_count \
            FROM hall \
            WHERE branch_id = $1 \
            ORDER BY hall_number ASC";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&branch_id])
            .await?
            .into_iter()
            .map(|row| Hall {
                number: row.get("hall_number"),
                kind: row.get("type"),
                seat_capacity: row.get("seat_capacity"),
                row_count: row.get("row_count"),
                col_count: row.get("col_count"),
            })
            .collect())
    }

    /// Halls of the branch able to project the given format.
    ///
    /// Standard (2D) showtimes fit any hall; IMAX, 4DX and 3D showtimes only
    /// fit halls of the same type.
    pub async fn get_halls_for_format(
        &self,
        branch_id: i32,
        format: &str,
    ) -> Result<Vec<Hall>, Error> {
        const SQL: &str = "\
            SELECT hall_number, type, seat_capacity, row_count, col_count \
            FROM hall \
            WHERE branch_id = $1 \
              AND (($2 IN ('STANDARD', '2D') \
                    AND type IN ('Standard', '2D', 'IMAX', '4DX', '3D')) \
                   OR ($2 IN ('IMAX', '4DX', '3D') AND type = $2)) \
            ORDER BY hall_number";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&branch_id, &format])
            .await?
            .into_iter()
            .map(|row| Hall {
                number: row.get("hall_number"),
                kind: row.get("type"),
                seat_capacity: row.get("seat_capacity"),
                row_count: row.get("row_count"),
                col_count: row.get("col_count"),
            })
            .collect())
    }

    pub async fn create_hall(
        &self,
        branch_id: i32,
        hall: &Hall,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL create_hall($1, $2, $3, $4, $5, $6)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &branch_id,
                    &hall.number,
                    &hall.kind,
                    &hall.seat_capacity,
                    &hall.row_count,
                    &hall.col_count,
                ],
            )
            .await
            .map(drop)
    }

    pub async fn update_hall(
        &self,
        branch_id: i32,
        hall: &Hall,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL update_hall($1, $2, $3, $4, $5, $6)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &branch_id,
                    &hall.number,
                    &hall.kind,
                    &hall.seat_capacity,
                    &hall.row_count,
                    &hall.col_count,
                ],
            )
            .await
            .map(drop)
    }

    pub async fn delete_hall(
        &self,
        branch_id: i32,
        hall_number: i32,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL delete_hall($1, $2)";
        self.shared()
            .await
            .execute(SQL, &[&branch_id, &hall_number])
            .await
            .map(drop)
    }
}
