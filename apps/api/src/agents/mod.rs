// AI-agent catalog: the agents a company has enabled and the templates they come from.

pub mod handlers;
