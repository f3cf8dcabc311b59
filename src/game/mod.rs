// Game modules: characters and their behaviour

pub mod characters;
