use serde::{Deserialize, Serialize};

use crate::db;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FoodDrink {
    pub id: i32,
    pub name: String,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub size: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<db::product::FoodDrink> for FoodDrink {
    fn from(f: db::product::FoodDrink) -> Self {
        Self {
            id: f.product.id,
            name: f.product.name,
            price: f.product.price,
            description: f.product.description,
            size: f.size,
            kind: f.kind,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Souvenir {
    pub id: i32,
    pub name: String,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub movie_id: i32,
}

impl From<db::product::Souvenir> for Souvenir {
    fn from(s: db::product::Souvenir) -> Self {
        Self {
            id: s.product.id,
            name: s.product.name,
            price: s.product.price,
            description: s.product.description,
            movie_id: s.movie_id,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewFoodDrink {
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    pub size: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<NewFoodDrink> for db::product::FoodDrinkInput {
    fn from(f: NewFoodDrink) -> Self {
        Self {
            name: Some(f.name),
            price: f.price,
            description: f.description,
            size: Some(f.size),
            kind: Some(f.kind),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FoodDrinkPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl From<FoodDrinkPatch> for db::product::FoodDrinkInput {
    fn from(f: FoodDrinkPatch) -> Self {
        Self {
            name: f.name,
            price: f.price,
            description: f.description,
            size: f.size,
            kind: f.kind,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewSouvenir {
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    pub movie_id: i32,
}

impl From<NewSouvenir> for db::product::SouvenirInput {
    fn from(s: NewSouvenir) -> Self {
        Self {
            name: Some(s.name),
            price: s.price,
            description: s.description,
            movie_id: Some(s.movie_id),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SouvenirPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub movie_id: Option<i32>,
}

impl From<SouvenirPatch> for db::product::SouvenirInput {
    fn from(s: SouvenirPatch) -> Self {
        Self {
            name: s.name,
            price: s.price,
            description: s.description,
            movie_id: s.movie_id,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Changed {
    pub message: String,
    pub product_id: i32,
}
