pub mod openrouteservice;
pub mod polyline;
pub mod route_generator;
pub mod routing_service;
