mod mime_types;
