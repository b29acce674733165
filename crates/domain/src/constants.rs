//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Listing configuration
pub const PAGE_SIZE: u32 = 20;
pub const QUICK_SEARCH_MIN_CHARS: usize = 2;
pub const QUICK_SEARCH_LIMIT: u32 = 10;

// Quoting configuration
pub const DEFAULT_VALIDITY_DAYS: i64 = 30;
pub const DEFAULT_MATERIAL_UNIT: &str = "UN";

// Document numbering
pub const NUMBER_RETRY_ATTEMPTS: u32 = 3;

// Dashboard configuration
pub const REVENUE_WINDOW_DAYS: i64 = 30;
pub const RECENT_QUOTES_LIMIT: u32 = 5;

/// Boilerplate terms attached to every contract generated from an accepted
/// quote. The company name is substituted by the lifecycle service.
pub const CONTRACT_TERMS_TEMPLATE: &str = "\
TERMOS E CONDIÇÕES DO CONTRATO DE PRESTAÇÃO DE SERVIÇOS

1. OBJETO: O presente contrato tem por objeto a prestação de serviços de oficina mecânica conforme especificado no orçamento aprovado.

2. PRAZO: Os serviços serão executados no prazo acordado entre as partes.

3. PREÇO E FORMA DE PAGAMENTO: O valor total dos serviços é o constante no orçamento aprovado, sendo o pagamento efetuado conforme acordado.

4. GARANTIA: Os serviços prestados possuem garantia conforme legislação vigente e políticas da empresa.

5. RESPONSABILIDADES: A {company} se responsabiliza pela execução dos serviços com qualidade e dentro do prazo acordado.

6. FORO: Fica eleito o foro da comarca onde se encontra a sede da {company} para dirimir quaisquer questões oriundas do presente contrato.";

/// Annotation written on a service order created from an accepted quote.
/// `{number}` is replaced with the quote number.
pub const ORDER_CREATED_NOTE_TEMPLATE: &str =
    "Ordem criada automaticamente a partir do orçamento {number}";
