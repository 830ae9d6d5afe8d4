mod artifact;
mod classpath;
