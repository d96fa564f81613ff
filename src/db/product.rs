use tokio_postgres::Error;

use super::Client;

#[derive(Clone, Debug)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Option<f64>,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct FoodDrink {
    pub product: Product,
    pub size: String,
    pub kind: String,
}

#[derive(Clone, Debug)]
pub struct Souvenir {
    pub product: Product,
    pub movie_id: i32,
}

/// Fields of a food or drink; absent fields keep their stored values on
/// update.
#[derive(Clone, Debug, Default)]
pub struct FoodDrinkInput {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub size: Option<String>,
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct SouvenirInput {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub movie_id: Option<i32>,
}

impl Client {
    /// Every product on sale, for the booking page.
    pub async fn get_products(&self) -> Result<Vec<Product>, Error> {
        const SQL: &str = "\
            SELECT product_id, name, price::FLOAT8 AS price, description \
            FROM product \
            ORDER BY product_id";
        Ok(self
            .shared()
            .await
            .query(SQL, &[])
            .await?
            .into_iter()
            .map(|row| Product {
                id: row.get("product_id"),
                name: row.get("name"),
                price: row.get("price"),
                description: row.get("description"),
            })
            .collect())
    }

    pub async fn get_food_drinks(&self) -> Result<Vec<FoodDrink>, Error> {
        const SQL: &str = "\
            SELECT p.product_id, p.name, p.price::FLOAT8 AS price, \
                   p.description, fd.size, fd.type \
            FROM product p \
            JOIN food_drink fd ON p.product_id = fd.product_id \
            ORDER BY p.product_id";
        Ok(self
            .shared()
            .await
            .query(SQL, &[])
            .await?
            .into_iter()
            .map(|row| FoodDrink {
                product: Product {
                    id: row.get("product_id"),
                    name: row.get("name"),
                    price: row.get("price"),
                    description: row.get("description"),
                },
                size: row.get("size"),
                kind: row.get("type"),
            })
            .collect())
    }

    pub async fn get_souvenirs(&self) -> Result<Vec<Souvenir>, Error> {
        const SQL: &str = "\
            SELECT p.product_id, p.name, p.price::FLOAT8 AS price, \
                   p.description, s.movie_id \
            FROM product p \
            JOIN souvenir s ON p.product_id = s.product_id \
            ORDER BY p.product_id";
        Ok(self
            .shared()
            .await
            .query(SQL, &[])
            .await?
            .into_iter()
            .map(|row| Souvenir {
                product: Product {
                    id: row.get("product_id"),
                    name: row.get("name"),
                    price: row.get("price"),
                    description: row.get("description"),
                },
                movie_id: row.get("movie_id"),
            })
            .collect())
    }

    pub async fn create_food_drink(
        &self,
        item: &FoodDrinkInput,
    ) -> Result<(), Error> {
        const SQL: &str =
            "CALL create_food_drink($1, $2::FLOAT8::NUMERIC, $3, $4, $5)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &item.name,
                    &item.price,
                    &item.description,
                    &item.size,
                    &item.kind,
                ],
            )
            .await
            .map(drop)
    }

    pub async fn update_food_drink(
        &self,
        id: i32,
        item: &FoodDrinkInput,
    ) -> Result<(), Error> {
        const SQL: &str = "\
            CALL update_food_drink($1, $2, $3::FLOAT8::NUMERIC, $4, $5, $6)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &id,
                    &item.name,
                    &item.price,
                    &item.description,
                    &item.size,
                    &item.kind,
                ],
            )
            .await
            .map(drop)
    }

    pub async fn delete_food_drink(&self, id: i32) -> Result<(), Error> {
        const SQL: &str = "CALL delete_food_drink($1)";
        self.shared().await.execute(SQL, &[&id]).await.map(drop)
    }

    pub async fn create_souvenir(
        &self,
        item: &SouvenirInput,
    ) -> Result<(), Error> {
        const SQL: &str =
            "CALL create_souvenir($1, $2::FLOAT8::NUMERIC, $3, $4)";
        self.shared()
            .await
            .execute(
                SQL,
                &[&item.name, &item.price, &item.description, &item.movie_id],
            )
            .await
            .map(drop)
    }

    pub async fn update_souvenir(
        &self,
        id: i32,
        item: &SouvenirInput,
    ) -> Result<(), Error> {
        const SQL: &str =
            "CALL update_souvenir($1, $2, $3::FLOAT8::NUMERIC, $4, $5)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &id,
                    &item.name,
                    &item.price,
                    &item.description,
                    &item.movie_id,
                ],
            )
            .await
            .map(drop)
    }

    /// Removes the souvenir together with its parent product.
    pub async fn delete_souvenir(&self, id: i32) -> Result<(), Error> {
        const SQL: &str = "CALL delete_souvenir($1)";
        self.shared().await.execute(SQL, &[&id]).await.map(drop)
    }
}
