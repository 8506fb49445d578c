//! Product catalog endpoints.
//!
//! The read routes go through the generic [`ServiceManager::request`] entry;
//! some deployments point them at a separate catalog upstream.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::http::HttpMethod;
use crate::manager::{RequestOptions, ServiceManager};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Catalog sort directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Product endpoints.
pub struct ProductService<'a> {
    manager: &'a ServiceManager,
}

impl ServiceManager {
    pub fn products(&self) -> ProductService<'_> {
        ProductService { manager: self }
    }
}

impl ProductService<'_> {
    pub async fn get_all(&self) -> Result<Vec<Product>, ServiceError> {
        self.manager
            .request(HttpMethod::Get, "/products", RequestOptions::default())
            .await
    }

    pub async fn get_one(&self, id: u64) -> Result<Product, ServiceError> {
        self.manager
            .request(HttpMethod::Get, &format!("/products/{id}"), RequestOptions::default())
            .await
    }

    pub async fn get_categories(&self) -> Result<Vec<String>, ServiceError> {
        self.manager
            .request(HttpMethod::Get, "/products/categories", RequestOptions::default())
            .await
    }

    pub async fn get_by_category(&self, category: &str) -> Result<Vec<Product>, ServiceError> {
        self.manager
            .request(
                HttpMethod::Get,
                &format!("/products/category/{category}"),
                RequestOptions::default(),
            )
            .await
    }

    pub async fn create(&self, product: &CreateProduct) -> Result<Product, ServiceError> {
        self.manager.post("/products", product).await
    }

    pub async fn update(&self, id: u64, data: &UpdateProduct) -> Result<Product, ServiceError> {
        self.manager.put(&format!("/products/{id}"), data).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        self.manager.delete(&format!("/products/{id}")).await
    }

    pub async fn get_limited(&self, limit: u32) -> Result<Vec<Product>, ServiceError> {
        self.manager
            .request(
                HttpMethod::Get,
                &format!("/products?limit={limit}"),
                RequestOptions::default(),
            )
            .await
    }

    pub async fn get_sorted(&self, sort: SortOrder) -> Result<Vec<Product>, ServiceError> {
        self.manager
            .request(
                HttpMethod::Get,
                &format!("/products?sort={}", sort.as_str()),
                RequestOptions::default(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Body;
    use crate::services::testing::harness;

    #[tokio::test]
    async fn product_wire_shape_round_trips() {
        let (transport, manager) = harness();
        transport.push_status(
            200,
            r#"{
                "id": 1,
                "title": "Mug",
                "price": 9.99,
                "description": "Holds coffee",
                "category": "kitchen",
                "image": "mug.png",
                "rating": {"rate": 4.5, "count": 12}
            }"#,
        );

        let product = manager.products().get_one(1).await.unwrap();
        assert_eq!(product.title, "Mug");
        assert_eq!(product.rating.count, 12);
    }

    #[tokio::test]
    async fn query_routes_format_parameters() {
        let (transport, manager) = harness();
        transport.push_status(200, "[]");
        transport.push_status(200, "[]");
        transport.push_status(200, "[]");

        manager.products().get_limited(5).await.unwrap();
        manager.products().get_sorted(SortOrder::Descending).await.unwrap();
        manager.products().get_by_category("kitchen").await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://localhost:3000/products?limit=5");
        assert_eq!(sent[1].url, "http://localhost:3000/products?sort=desc");
        assert_eq!(sent[2].url, "http://localhost:3000/products/category/kitchen");
    }

    #[tokio::test]
    async fn catalog_reads_map_to_the_product_paths() {
        let (transport, manager) = harness();
        transport.push_status(200, "[]");
        transport.push_status(200, r#"["kitchen", "desk"]"#);

        assert!(manager.products().get_all().await.unwrap().is_empty());
        let categories = manager.products().get_categories().await.unwrap();
        assert_eq!(categories, vec!["kitchen", "desk"]);

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(sent[0].url, "http://localhost:3000/products");
        assert_eq!(sent[1].url, "http://localhost:3000/products/categories");
    }

    #[tokio::test]
    async fn create_update_and_delete_write_the_catalog() {
        let (transport, manager) = harness();
        transport.push_status(
            201,
            r#"{
                "id": 2,
                "title": "Desk",
                "price": 120.0,
                "description": "Oak",
                "category": "office",
                "image": "desk.png",
                "rating": {"rate": 0.0, "count": 0}
            }"#,
        );
        transport.push_status(
            200,
            r#"{
                "id": 2,
                "title": "Desk",
                "price": 99.5,
                "description": "Oak",
                "category": "office",
                "image": "desk.png",
                "rating": {"rate": 0.0, "count": 0}
            }"#,
        );
        transport.push_status(204, "");

        manager
            .products()
            .create(&CreateProduct {
                title: "Desk".to_string(),
                price: 120.0,
                description: "Oak".to_string(),
                category: "office".to_string(),
                image: "desk.png".to_string(),
            })
            .await
            .unwrap();
        let cut = UpdateProduct {
            price: Some(99.5),
            ..UpdateProduct::default()
        };
        manager.products().update(2, &cut).await.unwrap();
        manager.products().delete(2).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].url, "http://localhost:3000/products");
        match &sent[0].body {
            Some(Body::Json(value)) => assert_eq!(value["title"], "Desk"),
            other => panic!("expected a JSON body, got {other:?}"),
        }
        assert_eq!(sent[1].method, HttpMethod::Put);
        assert_eq!(sent[1].url, "http://localhost:3000/products/2");
        match &sent[1].body {
            Some(Body::Json(value)) => {
                assert_eq!(value["price"], 99.5);
                assert!(value.get("title").is_none());
            }
            other => panic!("expected a JSON body, got {other:?}"),
        }
        assert_eq!(sent[2].method, HttpMethod::Delete);
        assert!(sent[2].body.is_none());
    }
}
