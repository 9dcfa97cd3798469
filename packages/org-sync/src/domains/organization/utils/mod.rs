pub mod sync_logic;
