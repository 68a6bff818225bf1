pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod categoria_repo;
pub use categoria_repo::CategoriaRepository;
pub mod taxa_repo;
pub use taxa_repo::TaxaRepository;
pub mod despesa_repo;
pub use despesa_repo::DespesaRepository;
pub mod fechamento_repo;
pub use fechamento_repo::FechamentoRepository;
pub mod vendas_repo;
pub use vendas_repo::VendasRepository;
