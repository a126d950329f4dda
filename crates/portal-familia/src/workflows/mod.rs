pub mod dignometro;
