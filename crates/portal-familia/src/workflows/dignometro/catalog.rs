use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A single yes/no question tied to one questionnaire dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub dimension: String,
    pub prompt: String,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        dimension: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            dimension: dimension.into(),
            prompt: prompt.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("question id '{0}' appears more than once")]
    DuplicateId(String),
    #[error("question at position {0} has an empty id")]
    EmptyId(usize),
}

/// Ordered, immutable question list. Order drives "step N of M" numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// The reference Dignômetro questionnaire. Ids are persisted with every assessment
    /// and must not change.
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if question.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(position));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateId(question.id.clone()));
            }
        }

        Ok(Self { questions })
    }

    pub fn list_questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Zero-based position of a question within the catalog.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|question| question.id == id)
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.questions.iter().map(|question| question.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        Question::new(
            "moradia",
            "Moradia",
            "A moradia tem CEP ou endereço digital, é segura, feita com alvenaria ou estrutura sólida, sem risco imediato de desabamento ou enchente?",
        ),
        Question::new(
            "agua",
            "Água",
            "A família tem acesso diário à água potável dentro de casa ou em local próximo, de forma segura e regular?",
        ),
        Question::new(
            "saneamento",
            "Saneamento",
            "A família possui acesso a banheiro sanitário adequado (com descarga e esgoto), de uso individual ou compartilhado com no máximo uma outra família?",
        ),
        Question::new(
            "educacao",
            "Educação",
            "As crianças da família (6 a 17 anos) estão matriculadas e frequentam a escola regularmente?",
        ),
        Question::new(
            "saude",
            "Saúde",
            "Se alguém ficou doente no último ano, a família conseguiu buscar atendimento médico adequado e acessar os remédios necessários?",
        ),
        Question::new(
            "alimentacao",
            "Alimentação",
            "Nos últimos 3 meses, todos os membros da família conseguiram fazer pelo menos duas refeições por dia, todos os dias?",
        ),
        Question::new(
            "renda_diversificada",
            "Renda Diversificada",
            "A família possui mais de uma fonte de renda ativa, como trabalho formal/informal, pensão, bicos ou pequenos negócios?",
        ),
        Question::new(
            "renda_estavel",
            "Renda Estável",
            "A responsável familiar conseguiu manter uma fonte de renda estável (formal ou informal) nos últimos 6 meses, sem interrupções longas?",
        ),
        Question::new("poupanca", "Poupança", "A família tem poupança?"),
        Question::new(
            "bens_conectividade",
            "Bens e Conectividade",
            "A família possui acesso à internet e conta com pelo menos três dos seguintes itens: geladeira, ventilador, máquina de lavar roupas ou tanquinho, fogão (a gás ou elétrico) ou televisão?",
        ),
    ]
}
