use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Curated categories: category name → allowed subcategories, plus the
/// accepted payment methods. Plain configuration data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    pub categories: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub payment_methods: BTreeSet<String>,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category<I, S>(mut self, name: impl Into<String>, subcategories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.insert(
            name.into(),
            subcategories.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn with_payment_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payment_methods.extend(methods.into_iter().map(Into::into));
        self
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Subcategories offered for `category` (empty for unknown categories).
    pub fn subcategories(&self, category: &str) -> impl Iterator<Item = &str> {
        self.categories
            .get(category)
            .into_iter()
            .flat_map(|subs| subs.iter().map(String::as_str))
    }

    pub fn has_subcategory(&self, category: &str, subcategory: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|subs| subs.contains(subcategory))
    }

    /// An empty method set means "any method".
    pub fn accepts_payment_method(&self, method: &str) -> bool {
        self.payment_methods.is_empty() || self.payment_methods.contains(method)
    }

    /// The categories used by the Brazilian variants of the app.
    pub fn default_pt_br() -> Self {
        Self::new()
            .with_category("Moradia", ["Aluguel", "Condomínio", "Energia", "Água", "Internet"])
            .with_category("Alimentação", ["Mercado", "Restaurante", "Delivery"])
            .with_category("Transporte", ["Combustível", "Uber", "Transporte público"])
            .with_category("Saúde", ["Farmácia", "Consulta", "Plano de saúde"])
            .with_category("Lazer", ["Cinema", "Viagem", "Assinaturas"])
            .with_category("Educação", ["Cursos", "Livros"])
            .with_category("Receita", ["Salário", "Freelance", "Rendimentos"])
            .with_category("Despesa", Vec::<String>::new())
            .with_payment_methods(["Dinheiro", "Débito", "Crédito", "Pix", "Transferência"])
    }
}

/// How the category field of a form is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "catalog", rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// Any text is accepted.
    #[default]
    FreeText,
    /// Category, subcategory and payment method must come from the catalog.
    Curated(CategoryCatalog),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcategory_lookup_follows_category() {
        let catalog = CategoryCatalog::default_pt_br();
        assert!(catalog.has_subcategory("Moradia", "Aluguel"));
        assert!(!catalog.has_subcategory("Lazer", "Aluguel"));
        assert!(!catalog.has_subcategory("Inexistente", "Aluguel"));
        assert_eq!(catalog.subcategories("Educação").count(), 2);
        assert_eq!(catalog.subcategories("Inexistente").count(), 0);
    }

    #[test]
    fn empty_payment_method_set_accepts_anything() {
        let catalog = CategoryCatalog::new().with_category("Casa", ["Luz"]);
        assert!(catalog.accepts_payment_method("Boleto"));

        let curated = catalog.with_payment_methods(["Pix"]);
        assert!(curated.accepts_payment_method("Pix"));
        assert!(!curated.accepts_payment_method("Boleto"));
    }
}
