use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::models::{Category, Subcategory};

/// Response DTO for subcategory
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubcategoryResponseDto {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<Subcategory> for SubcategoryResponseDto {
    fn from(s: Subcategory) -> Self {
        Self {
            id: s.id,
            category_id: s.category_id,
            name: s.name,
            slug: s.slug,
        }
    }
}

/// Response DTO for category with its subcategories
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryWithChildrenDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub subcategories: Vec<SubcategoryResponseDto>,
}

impl CategoryWithChildrenDto {
    /// Attach subcategories to their parent categories.
    ///
    /// Both inputs arrive name-ordered from the database; grouping
    /// preserves that order, and categories without children get an
    /// empty list.
    pub fn group(categories: Vec<Category>, subcategories: Vec<Subcategory>) -> Vec<Self> {
        categories
            .into_iter()
            .map(|category| {
                let children = subcategories
                    .iter()
                    .filter(|s| s.category_id == category.id)
                    .cloned()
                    .map(SubcategoryResponseDto::from)
                    .collect();
                Self {
                    id: category.id,
                    name: category.name,
                    slug: category.slug,
                    subcategories: children,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            created_at: Utc::now(),
        }
    }

    fn subcategory(parent: &Category, name: &str) -> Subcategory {
        Subcategory {
            id: Uuid::new_v4(),
            category_id: parent.id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_group_attaches_children_to_parent() {
        let apparel = category("Apparel");
        let tools = category("Tools");
        let subs = vec![
            subcategory(&apparel, "Shirts"),
            subcategory(&tools, "Drills"),
            subcategory(&apparel, "Trousers"),
        ];

        let grouped =
            CategoryWithChildrenDto::group(vec![apparel.clone(), tools.clone()], subs);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].subcategories.len(), 2);
        assert!(grouped[0]
            .subcategories
            .iter()
            .all(|s| s.category_id == apparel.id));
        assert_eq!(grouped[1].subcategories.len(), 1);
        assert_eq!(grouped[1].subcategories[0].name, "Drills");
    }

    #[test]
    fn test_group_leaves_childless_category_empty() {
        let lone = category("Machinery");
        let grouped = CategoryWithChildrenDto::group(vec![lone], vec![]);

        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].subcategories.is_empty());
    }
}
