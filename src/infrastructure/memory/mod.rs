//! Memory Layer - In-Memory State Management
//!
//! 内存版漫画页仓储（测试及 `database.backend = "memory"` 时使用）

mod manga_page_repo;

pub use manga_page_repo::InMemoryMangaPageRepository;
